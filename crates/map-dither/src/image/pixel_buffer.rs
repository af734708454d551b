//! PixelBuffer: a decoded RGB raster with dimension metadata.
//!
//! [`PixelBuffer`] is both the input and output of every pass in this crate.
//! Pixels are stored row-major; the invariants (`width > 0`, `height > 0`,
//! `pixels.len() == width * height`) are checked once at construction so
//! the passes can index without re-validating.

use crate::color::Rgb;
use crate::dither::DitherError;
use crate::palette::Palette;

/// A width × height grid of [`Rgb`] pixels in row-major order.
///
/// # Example
///
/// ```
/// use map_dither::{PixelBuffer, Rgb};
///
/// let buffer = PixelBuffer::from_fn(2, 2, |x, y| {
///     if (x + y) % 2 == 0 { Rgb::BLACK } else { Rgb::WHITE }
/// })
/// .unwrap();
///
/// assert_eq!(buffer.get(1, 0), Some(Rgb::WHITE));
/// assert_eq!(buffer.to_rgb_bytes().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Wrap row-major pixels.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::InvalidDimensions`] if either dimension is zero
    /// or `pixels.len() != width * height`.
    pub fn new(pixels: Vec<Rgb>, width: usize, height: usize) -> Result<Self, DitherError> {
        let expected = width.checked_mul(height);
        if width == 0 || height == 0 || expected != Some(pixels.len()) {
            return Err(DitherError::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// A buffer filled with a single color.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Result<Self, DitherError> {
        let len = width.checked_mul(height).ok_or(DitherError::InvalidDimensions {
            width,
            height,
            len: 0,
        })?;
        Self::new(vec![color; len], width, height)
    }

    /// A buffer whose pixel at `(x, y)` is `f(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, DitherError>
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        let mut pixels = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(pixels, width, height)
    }

    /// Build from packed `[R, G, B, R, G, B, ...]` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::InvalidDimensions`] if the byte count is not
    /// `width * height * 3`.
    pub fn from_rgb_bytes(bytes: &[u8], width: usize, height: usize) -> Result<Self, DitherError> {
        if bytes.len() % 3 != 0 {
            return Err(DitherError::InvalidDimensions {
                width,
                height,
                len: bytes.len() / 3,
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Self::new(pixels, width, height)
    }

    /// Packed `[R, G, B, ...]` bytes, length `width * height * 3`.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for px in &self.pixels {
            rgb.extend_from_slice(&px.to_bytes());
        }
        rgb
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Consume the buffer, returning its pixels.
    pub fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }

    /// Pixel at `(x, y)`, if in range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// One row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[Rgb] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Whether every pixel is an entry of `palette`.
    pub fn uses_only(&self, palette: &Palette) -> bool {
        self.pixels.iter().all(|&px| palette.contains(px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::new(vec![], 0, 4),
            Err(DitherError::InvalidDimensions { width: 0, height: 4, len: 0 })
        ));
        assert!(PixelBuffer::filled(3, 0, Rgb::BLACK).is_err());
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let err = PixelBuffer::new(vec![Rgb::BLACK; 5], 2, 2).unwrap_err();
        assert_eq!(
            err,
            DitherError::InvalidDimensions {
                width: 2,
                height: 2,
                len: 5
            }
        );
    }

    #[test]
    fn test_rgb_bytes_layout() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let buffer = PixelBuffer::from_rgb_bytes(&bytes, 2, 2).unwrap();
        assert_eq!(buffer.get(0, 0), Some(Rgb::new(1, 2, 3)));
        assert_eq!(buffer.get(1, 0), Some(Rgb::new(4, 5, 6)));
        assert_eq!(buffer.get(0, 1), Some(Rgb::new(7, 8, 9)));
        assert_eq!(buffer.row(1), &[Rgb::new(7, 8, 9), Rgb::new(10, 11, 12)]);
        assert_eq!(buffer.to_rgb_bytes(), bytes);
        assert_eq!(buffer.get(2, 0), None);
    }

    #[test]
    fn test_rgb_bytes_partial_pixel() {
        assert!(PixelBuffer::from_rgb_bytes(&[0, 0, 0, 0], 1, 1).is_err());
    }

    #[test]
    fn test_uses_only() {
        let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
        let ok = PixelBuffer::filled(2, 2, Rgb::WHITE).unwrap();
        let bad = PixelBuffer::filled(2, 2, Rgb::new(1, 1, 1)).unwrap();
        assert!(ok.uses_only(&palette));
        assert!(!bad.uses_only(&palette));
    }
}
