//! Test fixtures: input images and config files.

use map_dither::{PixelBuffer, Rgb};
use mapcraft::services::write_png;
use std::path::{Path, PathBuf};

/// Diagonal color ramp covering most of the RGB cube
pub fn gradient(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        Rgb::new(
            (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8,
            (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8,
            ((x + y) % 256) as u8,
        )
    })
    .unwrap()
}

/// Alternating dark/light 4x4 pattern
pub fn alternating_4x4() -> PixelBuffer {
    PixelBuffer::from_fn(4, 4, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb::new(10, 10, 10)
        } else {
            Rgb::new(250, 250, 250)
        }
    })
    .unwrap()
}

/// Write `buffer` as `name` inside `dir` and return the path
pub fn write_input(dir: &Path, name: &str, buffer: &PixelBuffer) -> PathBuf {
    let path = dir.join(name);
    write_png(&path, buffer).unwrap();
    path
}

/// Write a config file inside `dir` and return the path
pub fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("mapcraft.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}
