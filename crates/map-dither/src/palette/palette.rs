//! Immutable palette with nearest-color lookup.

use super::error::PaletteError;
use super::matcher::{nearest_index, nearest_index_f32};
use super::minecraft::MINECRAFT_MAP_COLORS;
use crate::color::Rgb;

/// An ordered, non-empty set of output colors.
///
/// A palette is built once and then only read; there are no mutating
/// methods. To change colors, build a new palette. Share it between
/// concurrent runs behind an `Arc`.
///
/// Duplicate entries are accepted. They are harmless: lookups resolve ties
/// to the first entry, so later duplicates are never returned by index.
///
/// # Example
///
/// ```
/// use map_dither::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.nearest(Rgb::new(30, 40, 20)), Rgb::BLACK);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
    // Parallel to `colors` when present
    names: Option<Vec<String>>,
}

impl Palette {
    /// Create a palette from colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self {
            colors: colors.to_vec(),
            names: None,
        })
    }

    /// Create a palette from named colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if `entries` is empty.
    pub fn with_names<S: AsRef<str>>(entries: &[(S, Rgb)]) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self {
            colors: entries.iter().map(|(_, c)| *c).collect(),
            names: Some(entries.iter().map(|(n, _)| n.as_ref().to_string()).collect()),
        })
    }

    /// Create a palette from hex color strings.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] for the first unparsable entry,
    /// or [`PaletteError::EmptyPalette`] if `hex` is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use map_dither::{Palette, Rgb};
    ///
    /// let palette = Palette::from_hex(&["#000", "#FFFFFF"]).unwrap();
    /// assert_eq!(palette.colors(), &[Rgb::BLACK, Rgb::WHITE]);
    /// ```
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .enumerate()
            .map(|(index, s)| {
                s.as_ref()
                    .parse::<Rgb>()
                    .map_err(|source| PaletteError::ParseColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    /// The built-in Minecraft map palette (30 base colors).
    pub fn minecraft() -> Self {
        Self {
            colors: MINECRAFT_MAP_COLORS.iter().map(|(_, c)| *c).collect(),
            names: Some(
                MINECRAFT_MAP_COLORS
                    .iter()
                    .map(|(n, _)| n.to_string())
                    .collect(),
            ),
        }
    }

    /// The colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Number of entries. Always at least 1.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, if in range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    /// Name of the entry at `index`, for named palettes.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(String::as_str)
    }

    /// Index of the entry closest to `pixel` (first entry wins ties).
    #[inline]
    pub fn find_nearest(&self, pixel: Rgb) -> usize {
        // Non-empty by construction
        nearest_index(pixel, &self.colors).unwrap_or(0)
    }

    /// Entry closest to `pixel` (first entry wins ties).
    #[inline]
    pub fn nearest(&self, pixel: Rgb) -> Rgb {
        self.colors[self.find_nearest(pixel)]
    }

    /// Index of the entry closest to accumulated float channels.
    #[inline]
    pub fn find_nearest_f32(&self, channels: [f32; 3]) -> usize {
        nearest_index_f32(channels, &self.colors).unwrap_or(0)
    }

    /// Whether `color` is one of the entries.
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }
}
