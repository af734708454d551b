//! Minecraft map base colors.

use crate::color::Rgb;

/// Base map colors (Minecraft 1.12+), in lookup order.
///
/// Order matters: under an exact distance tie the earlier entry wins, so
/// reordering this table changes output.
pub const MINECRAFT_MAP_COLORS: [(&str, Rgb); 30] = [
    ("air", Rgb::new(0, 0, 0)),
    ("grass", Rgb::new(127, 178, 56)),
    ("sand", Rgb::new(247, 233, 163)),
    ("wool", Rgb::new(199, 199, 199)),
    ("fire", Rgb::new(255, 0, 0)),
    ("ice", Rgb::new(160, 160, 255)),
    ("metal", Rgb::new(167, 167, 167)),
    ("plant", Rgb::new(0, 124, 0)),
    ("snow", Rgb::new(255, 255, 255)),
    ("clay", Rgb::new(164, 168, 184)),
    ("dirt", Rgb::new(151, 109, 77)),
    ("stone", Rgb::new(112, 112, 112)),
    ("water", Rgb::new(64, 64, 255)),
    ("wood", Rgb::new(143, 119, 72)),
    ("quartz", Rgb::new(255, 252, 245)),
    ("orange", Rgb::new(216, 127, 51)),
    ("magenta", Rgb::new(178, 76, 216)),
    ("light_blue", Rgb::new(102, 153, 216)),
    ("yellow", Rgb::new(229, 229, 51)),
    ("lime", Rgb::new(127, 204, 25)),
    ("pink", Rgb::new(242, 127, 165)),
    ("gray", Rgb::new(76, 76, 76)),
    ("silver", Rgb::new(153, 153, 153)),
    ("cyan", Rgb::new(76, 127, 153)),
    ("purple", Rgb::new(127, 63, 178)),
    ("blue", Rgb::new(51, 76, 178)),
    ("brown", Rgb::new(102, 76, 51)),
    ("green", Rgb::new(102, 127, 51)),
    ("red", Rgb::new(153, 51, 51)),
    ("black", Rgb::new(25, 25, 25)),
];
