//! Palette types and nearest-color matching
//!
//! This module provides the immutable [`Palette`], the linear-scan
//! nearest-color matcher, and the built-in Minecraft map color table.

mod error;
mod matcher;
mod minecraft;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use matcher::{
    nearest, nearest_index, nearest_index_f32, MatchCache, DEFAULT_CACHE_LIMIT,
};
pub use minecraft::MINECRAFT_MAP_COLORS;
pub use palette::Palette;
