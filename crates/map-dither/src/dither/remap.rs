//! Nearest-color remap without error diffusion.

use std::sync::Arc;

use super::{row_percent, try_alloc_pixels, Dither, DitherError};
use crate::image::PixelBuffer;
use crate::palette::{MatchCache, Palette};
use crate::task::CancelToken;

/// Replace every pixel with its nearest palette entry.
///
/// No error is carried between pixels, so flat regions stay flat. Lookups
/// are memoized per call in a [`MatchCache`] bounded by
/// [`DEFAULT_CACHE_LIMIT`](crate::DEFAULT_CACHE_LIMIT) entries.
///
/// # Example
///
/// ```
/// use map_dither::{Dither, NearestRemap, Palette, PixelBuffer, Rgb};
/// use std::sync::Arc;
///
/// let palette = Arc::new(Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap());
/// let input = PixelBuffer::filled(3, 3, Rgb::new(200, 200, 200)).unwrap();
///
/// let output = NearestRemap::new(palette).dither(&input, &mut |_| {}).unwrap();
/// assert!(output.pixels().iter().all(|&px| px == Rgb::WHITE));
/// ```
#[derive(Debug, Clone)]
pub struct NearestRemap {
    palette: Arc<Palette>,
}

impl NearestRemap {
    /// Remap pass over `palette`.
    pub fn new(palette: Arc<Palette>) -> Self {
        Self { palette }
    }

    /// The palette pixels are mapped to.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl Dither for NearestRemap {
    fn dither_cancellable(
        &self,
        input: &PixelBuffer,
        on_progress: &mut dyn FnMut(f32),
        cancel: &CancelToken,
    ) -> Result<PixelBuffer, DitherError> {
        let width = input.width();
        let height = input.height();
        let mut output = try_alloc_pixels(width * height)?;
        let mut cache = MatchCache::new(&self.palette);

        for y in 0..height {
            if cancel.is_cancelled() {
                return Err(DitherError::Cancelled);
            }
            output.extend(input.row(y).iter().map(|&px| cache.nearest(px)));
            on_progress(row_percent(y + 1, height));
        }

        let result = PixelBuffer::new(output, width, height)?;
        on_progress(100.0);
        Ok(result)
    }
}
