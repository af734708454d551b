//! Assertion helpers for tests.

use map_dither::{Palette, PixelBuffer};
use pretty_assertions::assert_eq;
use std::path::Path;

/// Assert the file at `path` is a PNG and decode it
pub fn read_png_file(path: &Path) -> PixelBuffer {
    let bytes = std::fs::read(path).unwrap();
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG at {}, got {} bytes starting with {:?}",
        path.display(),
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    mapcraft::services::decode_png(&bytes).unwrap()
}

/// Assert every pixel is a palette entry
pub fn assert_palette_only(buffer: &PixelBuffer, palette: &Palette) {
    if let Some(px) = buffer.pixels().iter().find(|px| !palette.contains(**px)) {
        panic!("Pixel {px} is not in the palette");
    }
}

/// Assert two buffers have the same dimensions
pub fn assert_same_size(a: &PixelBuffer, b: &PixelBuffer) {
    assert_eq!(
        (a.width(), a.height()),
        (b.width(), b.height()),
        "Buffer dimensions differ"
    );
}
