//! Error type for dithering passes.

use std::fmt;

use crate::palette::PaletteError;

/// Failure of a quantization pass.
///
/// No pass ever returns a partial buffer alongside an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DitherError {
    /// Input is smaller than the selected edge mode can process
    BufferTooSmall {
        /// Input width
        width: usize,
        /// Input height
        height: usize,
        /// Minimum width and height required
        min: (usize, usize),
    },
    /// Pixel count does not match `width * height`, or a dimension is zero
    InvalidDimensions {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Number of pixels supplied
        len: usize,
    },
    /// Palette could not be used (e.g. it has no entries)
    Palette(PaletteError),
    /// Internal failure, such as an allocation that could not be satisfied
    Processing(String),
    /// The pass observed its cancel token and stopped early
    Cancelled,
}

impl From<PaletteError> for DitherError {
    fn from(err: PaletteError) -> Self {
        DitherError::Palette(err)
    }
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::BufferTooSmall { width, height, min } => {
                write!(
                    f,
                    "buffer too small: {}x{} (minimum {}x{})",
                    width, height, min.0, min.1
                )
            }
            DitherError::InvalidDimensions { width, height, len } => {
                write!(
                    f,
                    "invalid dimensions: {}x{} with {} pixels",
                    width, height, len
                )
            }
            DitherError::Palette(err) => write!(f, "palette error: {}", err),
            DitherError::Processing(msg) => write!(f, "processing error: {}", msg),
            DitherError::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::Palette(err) => Some(err),
            _ => None,
        }
    }
}
