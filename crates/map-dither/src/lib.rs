//! map-dither: Minecraft map-art color reduction
//!
//! This library turns arbitrary RGB pixels into pixels drawn from a small
//! fixed palette, by default the 30 base colors a Minecraft map can show.
//!
//! # Quick Start
//!
//! The [`MapDitherer`] builder is the primary entry point:
//!
//! ```
//! use map_dither::{ConversionMode, MapDitherer, PixelBuffer, Rgb};
//!
//! let converter = MapDitherer::minecraft().mode(ConversionMode::PaletteDither);
//! let input = PixelBuffer::filled(8, 8, Rgb::new(200, 120, 40)).unwrap();
//!
//! let output = converter.convert(&input, &mut |_| {}).unwrap();
//! assert!(output.uses_only(converter.palette()));
//! ```
//!
//! # Background Conversion
//!
//! Large images are converted off the calling thread with
//! [`MapDitherer::spawn()`], which returns a [`TaskHandle`]:
//!
//! ```
//! use map_dither::{MapDitherer, PixelBuffer, Rgb};
//!
//! let handle = MapDitherer::minecraft()
//!     .spawn(PixelBuffer::filled(128, 128, Rgb::new(10, 200, 10)).unwrap());
//!
//! let output = handle.wait().expect("not cancelled").unwrap();
//! assert_eq!(output.width(), 128);
//! ```
//!
//! # Conversion Modes
//!
//! - [`ConversionMode::Map`]: nearest palette color per pixel (default)
//! - [`ConversionMode::Dither`]: Floyd-Steinberg against a per-channel
//!   black/white threshold
//! - [`ConversionMode::PaletteDither`]: Floyd-Steinberg against the palette
//!
//! # Color Matching
//!
//! Distances are squared Euclidean distances over 8-bit sRGB channels. No
//! gamma decoding or perceptual space is involved: map colors are compared
//! the way the game's own renderer stores them. Ties resolve to the palette
//! entry listed first, so results are deterministic for a given palette
//! order.
//!
//! Error diffusion also runs in plain RGB. The accumulated value of a pixel
//! may leave `0..=255` while error is carried; only the quantized output is
//! restricted to palette colors.

pub mod api;
pub mod color;
pub mod dither;
pub mod image;
pub mod palette;
pub mod task;

#[cfg(test)]
mod domain_tests;

pub use api::{ConversionMode, MapDitherer, MapError};
pub use color::Rgb;
pub use dither::{
    Dither, DitherError, DitherOptions, EdgeMode, FloydSteinberg, Kernel, NearestRemap,
    Quantizer, FLOYD_STEINBERG, THRESHOLD,
};
pub use image::PixelBuffer;
pub use palette::{
    nearest, nearest_index, nearest_index_f32, MatchCache, Palette, PaletteError,
    ParseColorError, DEFAULT_CACHE_LIMIT, MINECRAFT_MAP_COLORS,
};
pub use task::{
    CancelToken, CancellableTask, ProgressReport, TaskContext, TaskFailure, TaskHandle,
    TaskResult, TaskState,
};
