//! Dithering options and configuration.

/// How the ditherer treats the last row and last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Visit every pixel. Diffusion targets outside the buffer are dropped.
    ///
    /// Works for any buffer of at least 1×1.
    #[default]
    Full,

    /// Visit rows `0..height-1` and columns `0..width-1` only.
    ///
    /// The last row and last column diffuse no error. With
    /// [`Quantizer::Threshold`](crate::Quantizer::Threshold) they are not
    /// quantized either and keep their input value plus whatever error
    /// reached them, clamped to `0..=255`. With a palette quantizer they are
    /// snapped to the nearest palette entry.
    /// Below-left diffusion at column 0 is dropped instead of wrapping to
    /// the last column. Requires at least 2×2.
    Legacy,
}

/// Configuration options for error diffusion dithering.
///
/// # Example
///
/// ```
/// use map_dither::{DitherOptions, EdgeMode};
///
/// let options = DitherOptions::new().edges(EdgeMode::Legacy);
/// assert_eq!(options.edges, EdgeMode::Legacy);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DitherOptions {
    /// Edge handling for the last row and column.
    ///
    /// Default: [`EdgeMode::Full`]
    pub edges: EdgeMode,
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set edge handling.
    #[inline]
    pub fn edges(mut self, edges: EdgeMode) -> Self {
        self.edges = edges;
        self
    }

    /// Minimum `(width, height)` the selected edge mode can process.
    #[inline]
    pub fn min_dimensions(&self) -> (usize, usize) {
        match self.edges {
            EdgeMode::Full => (1, 1),
            EdgeMode::Legacy => (2, 2),
        }
    }
}
