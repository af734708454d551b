//! MapDitherer builder -- the primary ergonomic entry point for the crate.
//!
//! [`MapDitherer`] selects a conversion mode and edge handling for a palette
//! and runs the matching pass either inline or as a [`CancellableTask`].

use std::sync::Arc;

use super::error::MapError;
use crate::dither::{
    Dither, DitherOptions, EdgeMode, FloydSteinberg, NearestRemap, Quantizer,
};
use crate::image::PixelBuffer;
use crate::palette::Palette;
use crate::task::{CancelToken, CancellableTask, TaskHandle};

/// How input pixels become output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Nearest palette color per pixel, no error diffusion.
    #[default]
    Map,
    /// Floyd-Steinberg against a per-channel black/white threshold.
    ///
    /// Ignores the palette; output channels are 0 or 255.
    Dither,
    /// Floyd-Steinberg against the nearest palette color.
    ///
    /// Every output pixel is a palette entry, whatever the edge mode.
    PaletteDither,
}

/// High-level converter from RGB pixels to map colors.
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`convert()`](Self::convert) and [`spawn()`](Self::spawn) take `&self`
///   so one converter can serve many images; the palette is shared, never
///   copied per run
///
/// # Example
///
/// ```
/// use map_dither::{ConversionMode, MapDitherer, Palette, PixelBuffer, Rgb};
///
/// let converter = MapDitherer::new(Palette::minecraft()).mode(ConversionMode::PaletteDither);
///
/// let input = PixelBuffer::filled(4, 4, Rgb::new(100, 150, 60)).unwrap();
/// let output = converter.convert(&input, &mut |_| {}).unwrap();
/// assert!(output.uses_only(converter.palette()));
/// ```
#[derive(Debug, Clone)]
pub struct MapDitherer {
    palette: Arc<Palette>,
    mode: ConversionMode,
    options: DitherOptions,
}

impl MapDitherer {
    /// Converter over `palette` in [`ConversionMode::Map`].
    pub fn new(palette: Palette) -> Self {
        Self::with_shared_palette(Arc::new(palette))
    }

    /// Converter over an already shared palette.
    pub fn with_shared_palette(palette: Arc<Palette>) -> Self {
        Self {
            palette,
            mode: ConversionMode::default(),
            options: DitherOptions::default(),
        }
    }

    /// Converter over the built-in Minecraft map palette.
    pub fn minecraft() -> Self {
        Self::new(Palette::minecraft())
    }

    /// Set the conversion mode.
    #[inline]
    pub fn mode(mut self, mode: ConversionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set edge handling for the dithering modes.
    #[inline]
    pub fn edges(mut self, edges: EdgeMode) -> Self {
        self.options = self.options.edges(edges);
        self
    }

    /// The palette output colors are drawn from.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Selected conversion mode.
    #[inline]
    pub fn conversion_mode(&self) -> ConversionMode {
        self.mode
    }

    /// Selected edge handling.
    #[inline]
    pub fn edge_mode(&self) -> EdgeMode {
        self.options.edges
    }

    fn pass(&self) -> Box<dyn Dither + Send + Sync> {
        match self.mode {
            ConversionMode::Map => Box::new(NearestRemap::new(Arc::clone(&self.palette))),
            ConversionMode::Dither => {
                Box::new(FloydSteinberg::new(Quantizer::Threshold).options(self.options.clone()))
            }
            ConversionMode::PaletteDither => Box::new(
                FloydSteinberg::new(Quantizer::Palette(Arc::clone(&self.palette)))
                    .options(self.options.clone()),
            ),
        }
    }

    /// Convert on the current thread.
    pub fn convert(
        &self,
        input: &PixelBuffer,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<PixelBuffer, MapError> {
        self.convert_cancellable(input, on_progress, &CancelToken::new())
    }

    /// Convert on the current thread, stopping early when `cancel` is set.
    pub fn convert_cancellable(
        &self,
        input: &PixelBuffer,
        on_progress: &mut dyn FnMut(f32),
        cancel: &CancelToken,
    ) -> Result<PixelBuffer, MapError> {
        Ok(self.pass().dither_cancellable(input, on_progress, cancel)?)
    }

    /// Convert on a worker thread.
    ///
    /// The returned handle reports progress, accepts cancellation, and yields
    /// the output buffer once.
    pub fn spawn(&self, input: PixelBuffer) -> TaskHandle<PixelBuffer, MapError> {
        let pass = self.pass();
        CancellableTask::new(move |ctx| {
            let mut progress = ctx.progress_fn();
            pass.dither_cancellable(&input, &mut progress, ctx.cancel_token())
                .map_err(MapError::from)
        })
        .thread_name("map-dither")
        .submit()
    }
}
