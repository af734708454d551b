//! Unified error type for the map-dither public API.
//!
//! [`MapError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use crate::dither::DitherError;
use crate::palette::{PaletteError, ParseColorError};
use std::fmt;

/// Unified error type for the map-dither public API.
///
/// # Example
///
/// ```
/// use map_dither::{MapDitherer, MapError, Palette};
///
/// fn build() -> Result<MapDitherer, MapError> {
///     let palette = Palette::from_hex(&["#000000", "#FFFFFF"])?;
///     Ok(MapDitherer::new(palette))
/// }
/// assert!(build().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// Palette validation error (empty palette or bad hex entry)
    Palette(PaletteError),
    /// A quantization pass failed
    Dither(DitherError),
}

impl MapError {
    /// Whether this error means the input buffer was rejected as too small.
    pub fn is_buffer_too_small(&self) -> bool {
        matches!(self, MapError::Dither(DitherError::BufferTooSmall { .. }))
    }

    /// Whether this error means the palette had no entries.
    pub fn is_empty_palette(&self) -> bool {
        matches!(
            self,
            MapError::Palette(PaletteError::EmptyPalette)
                | MapError::Dither(DitherError::Palette(PaletteError::EmptyPalette))
        )
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Palette(err) => write!(f, "palette error: {}", err),
            MapError::Dither(err) => write!(f, "dither error: {}", err),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Palette(err) => Some(err),
            MapError::Dither(err) => Some(err),
        }
    }
}

impl From<PaletteError> for MapError {
    fn from(err: PaletteError) -> Self {
        MapError::Palette(err)
    }
}

impl From<ParseColorError> for MapError {
    fn from(err: ParseColorError) -> Self {
        MapError::Palette(PaletteError::ParseColor {
            index: 0,
            source: err,
        })
    }
}

impl From<DitherError> for MapError {
    fn from(err: DitherError) -> Self {
        MapError::Dither(err)
    }
}
