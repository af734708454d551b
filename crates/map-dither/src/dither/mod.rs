//! Quantization passes.
//!
//! Two passes turn an arbitrary [`PixelBuffer`] into one restricted to a
//! fixed set of colors:
//!
//! - [`FloydSteinberg`]: error diffusion. Each pixel is quantized and the
//!   difference is pushed onto its unvisited neighbors.
//! - [`NearestRemap`]: every pixel independently replaced by its nearest
//!   palette entry, no error carried.
//!
//! Both implement [`Dither`], report progress once per row, and check a
//! [`CancelToken`] once per row.
//!
//! # Example
//!
//! ```
//! use map_dither::{Dither, FloydSteinberg, PixelBuffer, Quantizer, Rgb};
//!
//! let input = PixelBuffer::filled(4, 4, Rgb::new(30, 30, 30)).unwrap();
//! let mut last = 0.0;
//! let output = FloydSteinberg::new(Quantizer::Threshold)
//!     .dither(&input, &mut |p| last = p)
//!     .unwrap();
//!
//! assert_eq!(last, 100.0);
//! assert!(output.pixels().iter().all(|&px| px == Rgb::BLACK || px == Rgb::WHITE));
//! ```

mod error;
mod floyd_steinberg;
mod kernel;
mod options;
mod remap;

use std::sync::Arc;

pub use error::DitherError;
pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use options::{DitherOptions, EdgeMode};
pub use remap::NearestRemap;

use crate::color::Rgb;
use crate::image::PixelBuffer;
use crate::palette::Palette;
use crate::task::CancelToken;

/// Channel value at or above which the binary quantizer outputs 255.
pub const THRESHOLD: f32 = 128.0;

/// The rule that snaps an accumulated pixel to an output color.
#[derive(Debug, Clone)]
pub enum Quantizer {
    /// Per-channel binary threshold: `< 128` becomes 0, otherwise 255.
    ///
    /// Output colors are the eight corners of the RGB cube.
    Threshold,
    /// Nearest palette entry by squared RGB distance.
    Palette(Arc<Palette>),
}

impl Quantizer {
    /// Palette quantizer over raw colors.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::Palette`] wrapping
    /// [`PaletteError::EmptyPalette`](crate::PaletteError::EmptyPalette)
    /// if `colors` is empty.
    pub fn from_colors(colors: &[Rgb]) -> Result<Self, DitherError> {
        Ok(Quantizer::Palette(Arc::new(Palette::new(colors)?)))
    }

    /// Snap accumulated channels to an output color.
    #[inline]
    pub fn quantize(&self, channels: [f32; 3]) -> Rgb {
        match self {
            Quantizer::Threshold => {
                let snap = |v: f32| if v < THRESHOLD { 0 } else { 255 };
                Rgb::new(snap(channels[0]), snap(channels[1]), snap(channels[2]))
            }
            Quantizer::Palette(palette) => palette.colors()[palette.find_nearest_f32(channels)],
        }
    }
}

/// A full-image quantization pass.
///
/// `on_progress` receives a percentage in `0.0..=100.0` on the computing
/// thread after each row, and exactly `100.0` once the pass completes.
/// Values never decrease within one call. The last processed row already
/// reports `100.0`, so the final value normally arrives twice.
pub trait Dither {
    /// Run the pass, stopping with [`DitherError::Cancelled`] at the next
    /// row boundary after `cancel` is set.
    fn dither_cancellable(
        &self,
        input: &PixelBuffer,
        on_progress: &mut dyn FnMut(f32),
        cancel: &CancelToken,
    ) -> Result<PixelBuffer, DitherError>;

    /// Run the pass to completion.
    fn dither(
        &self,
        input: &PixelBuffer,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<PixelBuffer, DitherError> {
        self.dither_cancellable(input, on_progress, &CancelToken::new())
    }
}

/// Reserve an output vector, surfacing allocation failure as an error.
pub(crate) fn try_alloc_pixels(len: usize) -> Result<Vec<Rgb>, DitherError> {
    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|e| {
        DitherError::Processing(format!("cannot allocate {} output pixels: {}", len, e))
    })?;
    Ok(out)
}

/// Percentage of `done` out of `total` rows.
#[inline]
pub(crate) fn row_percent(done: usize, total: usize) -> f32 {
    if total == 0 {
        100.0
    } else {
        (done as f32 * 100.0 / total as f32).min(100.0)
    }
}
