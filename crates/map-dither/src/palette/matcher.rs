//! Nearest-color matching.
//!
//! All lookups are a linear scan with squared Euclidean RGB distance. The
//! comparison is strict (`<`), so among entries at the same minimum distance
//! the one appearing first in palette order wins. Output reproducibility
//! depends on this; any faster index must keep the same tie-break.

use std::collections::HashMap;

use super::error::PaletteError;
use super::palette::Palette;
use crate::color::Rgb;

/// Index of the color in `colors` closest to `pixel`.
///
/// # Errors
///
/// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
pub fn nearest_index(pixel: Rgb, colors: &[Rgb]) -> Result<usize, PaletteError> {
    let (first, rest) = colors.split_first().ok_or(PaletteError::EmptyPalette)?;

    let mut best_idx = 0;
    let mut best_dist = pixel.distance_sq(*first);
    for (i, candidate) in rest.iter().enumerate() {
        let dist = pixel.distance_sq(*candidate);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i + 1;
        }
    }
    Ok(best_idx)
}

/// The color in `colors` closest to `pixel`.
///
/// # Errors
///
/// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
///
/// # Example
///
/// ```
/// use map_dither::{nearest, Rgb};
///
/// let colors = [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)];
/// assert_eq!(nearest(Rgb::new(200, 190, 210), &colors).unwrap(), Rgb::WHITE);
/// assert!(nearest(Rgb::BLACK, &[]).is_err());
/// ```
pub fn nearest(pixel: Rgb, colors: &[Rgb]) -> Result<Rgb, PaletteError> {
    nearest_index(pixel, colors).map(|i| colors[i])
}

/// Float variant of [`nearest_index`] for accumulated dither values.
///
/// Channels may lie outside `0..=255` after error diffusion; they are
/// compared as-is so that overshoot still pulls toward the extreme entries.
pub fn nearest_index_f32(channels: [f32; 3], colors: &[Rgb]) -> Result<usize, PaletteError> {
    let (first, rest) = colors.split_first().ok_or(PaletteError::EmptyPalette)?;

    let mut best_idx = 0;
    let mut best_dist = first.distance_sq_f32(channels);
    for (i, candidate) in rest.iter().enumerate() {
        let dist = candidate.distance_sq_f32(channels);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i + 1;
        }
    }
    Ok(best_idx)
}

/// Distinct colors a [`MatchCache`] remembers by default.
///
/// 65536 entries is roughly 1 MiB of table; photographs with more distinct
/// colors than this fall back to the linear scan for the overflow.
pub const DEFAULT_CACHE_LIMIT: usize = 1 << 16;

/// Memoizing matcher for passes that look up many repeated colors.
///
/// Misses fall through to the linear scan, so results (ties included) are
/// identical to [`Palette::find_nearest`]. At most `limit` distinct colors
/// are stored; once full, new colors are matched but not remembered.
#[derive(Debug)]
pub struct MatchCache<'a> {
    palette: &'a Palette,
    cache: HashMap<Rgb, usize>,
    limit: usize,
}

impl<'a> MatchCache<'a> {
    /// Create an empty cache over `palette` holding up to
    /// [`DEFAULT_CACHE_LIMIT`] colors.
    pub fn new(palette: &'a Palette) -> Self {
        Self::with_limit(palette, DEFAULT_CACHE_LIMIT)
    }

    /// Create an empty cache that remembers at most `limit` colors.
    pub fn with_limit(palette: &'a Palette, limit: usize) -> Self {
        Self {
            palette,
            cache: HashMap::new(),
            limit,
        }
    }

    /// Palette index nearest to `pixel`.
    #[inline]
    pub fn find_nearest(&mut self, pixel: Rgb) -> usize {
        if let Some(&idx) = self.cache.get(&pixel) {
            return idx;
        }
        let idx = self.palette.find_nearest(pixel);
        if self.cache.len() < self.limit {
            self.cache.insert(pixel, idx);
        }
        idx
    }

    /// Palette color nearest to `pixel`.
    #[inline]
    pub fn nearest(&mut self, pixel: Rgb) -> Rgb {
        let idx = self.find_nearest(pixel);
        self.palette.colors()[idx]
    }

    /// Number of distinct colors currently remembered.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no lookups have been made yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
