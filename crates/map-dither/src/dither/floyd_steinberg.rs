//! Floyd-Steinberg error diffusion dithering algorithm.
//!
//! Pixels are visited in row-major order. Each visited pixel is read with
//! the error accumulated so far (in `f32`), snapped by the [`Quantizer`],
//! and the difference is distributed to its unvisited neighbors:
//!
//! ```text
//!        X   7
//!    3   5   1
//! ```
//!
//! Weights are sixteenths. Targets outside the buffer are dropped; nothing
//! wraps around to the opposite edge.

use super::kernel::{ErrorBuffer, Kernel, FLOYD_STEINBERG};
use super::{
    row_percent, try_alloc_pixels, Dither, DitherError, DitherOptions, EdgeMode, Quantizer,
};
use crate::color::Rgb;
use crate::image::PixelBuffer;
use crate::task::CancelToken;

/// Floyd-Steinberg error diffusion.
///
/// With [`Quantizer::Threshold`] this is the classic binary dither; with
/// [`Quantizer::Palette`] the error is measured against the nearest palette
/// entry instead, which keeps the average tone of the input while using
/// only palette colors.
///
/// # Example
///
/// ```
/// use map_dither::{Dither, FloydSteinberg, Palette, PixelBuffer, Quantizer, Rgb};
/// use std::sync::Arc;
///
/// let palette = Arc::new(Palette::minecraft());
/// let input = PixelBuffer::filled(8, 8, Rgb::new(90, 140, 60)).unwrap();
///
/// let output = FloydSteinberg::new(Quantizer::Palette(palette.clone()))
///     .dither(&input, &mut |_| {})
///     .unwrap();
/// assert!(output.uses_only(&palette));
/// ```
#[derive(Debug, Clone)]
pub struct FloydSteinberg {
    quantizer: Quantizer,
    options: DitherOptions,
}

impl FloydSteinberg {
    /// Ditherer with default options ([`EdgeMode::Full`]).
    pub fn new(quantizer: Quantizer) -> Self {
        Self {
            quantizer,
            options: DitherOptions::default(),
        }
    }

    /// Replace the options.
    pub fn options(mut self, options: DitherOptions) -> Self {
        self.options = options;
        self
    }

    /// The kernel used for diffusion.
    pub fn kernel(&self) -> &'static Kernel {
        &FLOYD_STEINBERG
    }

    /// Output for a pixel outside the visited region.
    ///
    /// The threshold quantizer keeps the accumulated value; a palette
    /// quantizer snaps it so output stays within the palette. Neither
    /// diffuses further.
    fn settle_edge(&self, value: [f32; 3]) -> Rgb {
        match self.quantizer {
            Quantizer::Threshold => Rgb::from_f32_clamped(value),
            Quantizer::Palette(_) => self.quantizer.quantize(value),
        }
    }
}

impl Dither for FloydSteinberg {
    fn dither_cancellable(
        &self,
        input: &PixelBuffer,
        on_progress: &mut dyn FnMut(f32),
        cancel: &CancelToken,
    ) -> Result<PixelBuffer, DitherError> {
        let width = input.width();
        let height = input.height();

        let (min_w, min_h) = self.options.min_dimensions();
        if width < min_w || height < min_h {
            return Err(DitherError::BufferTooSmall {
                width,
                height,
                min: (min_w, min_h),
            });
        }

        // Region that is quantized; everything outside keeps input + error.
        let (rows, cols) = match self.options.edges {
            EdgeMode::Full => (height, width),
            EdgeMode::Legacy => (height - 1, width - 1),
        };

        let kernel = self.kernel();
        let divisor = kernel.divisor as f32;
        let mut error_buf = ErrorBuffer::try_new(width, kernel.max_dy + 1).ok_or_else(|| {
            DitherError::Processing(format!("cannot allocate error rows for width {}", width))
        })?;
        let mut output = try_alloc_pixels(width * height)?;
        let pixels = input.pixels();

        for y in 0..height {
            let visiting_row = y < rows;
            if visiting_row && cancel.is_cancelled() {
                return Err(DitherError::Cancelled);
            }

            for x in 0..width {
                let original = pixels[y * width + x].to_f32();
                let accumulated = error_buf.get_accumulated(x);
                let value = [
                    original[0] + accumulated[0],
                    original[1] + accumulated[1],
                    original[2] + accumulated[2],
                ];

                if !visiting_row || x >= cols {
                    output.push(self.settle_edge(value));
                    continue;
                }

                let quantized = self.quantizer.quantize(value);
                output.push(quantized);

                let q = quantized.to_f32();
                let error = [value[0] - q[0], value[1] - q[1], value[2] - q[2]];
                for &(dx, dy, weight) in kernel.entries {
                    let nx = x as i64 + dx as i64;
                    let ny = y + dy as usize;
                    if nx < 0 || nx as usize >= width || ny >= height {
                        continue;
                    }
                    let w = weight as f32 / divisor;
                    error_buf.add_error(
                        nx as usize,
                        dy as usize,
                        [error[0] * w, error[1] * w, error[2] * w],
                    );
                }
            }

            error_buf.advance_row();
            if visiting_row {
                on_progress(row_percent(y + 1, rows));
            }
        }

        let result = PixelBuffer::new(output, width, height)?;
        on_progress(100.0);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn checkerboard(width: usize, height: usize, a: Rgb, b: Rgb) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| if (x + y) % 2 == 0 { a } else { b })
            .unwrap()
    }

    fn grey(v: u8) -> Rgb {
        Rgb::new(v, v, v)
    }

    fn red_channel(buffer: &PixelBuffer) -> Vec<Vec<u8>> {
        (0..buffer.height())
            .map(|y| buffer.row(y).iter().map(|px| px.r).collect())
            .collect()
    }

    #[test]
    fn test_exact_black_and_white_unchanged() {
        let ditherer = FloydSteinberg::new(Quantizer::Threshold);
        for color in [Rgb::BLACK, Rgb::WHITE] {
            let input = PixelBuffer::filled(5, 3, color).unwrap();
            let output = ditherer.dither(&input, &mut |_| {}).unwrap();
            assert_eq!(output, input);
        }
    }

    #[test]
    fn test_alternating_4x4_full() {
        let input = checkerboard(4, 4, grey(10), grey(250));
        let output = FloydSteinberg::new(Quantizer::Threshold)
            .dither(&input, &mut |_| {})
            .unwrap();

        assert_eq!(
            red_channel(&output),
            vec![
                vec![0, 255, 0, 255],
                vec![255, 0, 255, 0],
                vec![0, 255, 0, 255],
                vec![255, 0, 255, 0],
            ]
        );
    }

    #[test]
    fn test_alternating_4x4_legacy_leaves_edges() {
        let input = checkerboard(4, 4, grey(10), grey(250));
        let output = FloydSteinberg::new(Quantizer::Threshold)
            .options(DitherOptions::new().edges(EdgeMode::Legacy))
            .dither(&input, &mut |_| {})
            .unwrap();

        let rows = red_channel(&output);
        // Visited region is pure black/white on each pixel's own side of 128
        for y in 0..3 {
            for x in 0..3 {
                let expected = if (x + y) % 2 == 0 { 0 } else { 255 };
                assert_eq!(rows[y][x], expected, "pixel ({x}, {y})");
            }
        }
        // Last column and last row keep input plus diffused error
        assert_eq!(rows[0][3], 254);
        assert_eq!(rows[1][3], 12);
        assert_eq!(rows[3], vec![254, 14, 254, 11]);
    }

    #[test]
    fn test_legacy_rejects_thin_buffers() {
        let ditherer = FloydSteinberg::new(Quantizer::Threshold)
            .options(DitherOptions::new().edges(EdgeMode::Legacy));
        for (w, h) in [(1, 5), (5, 1), (1, 1)] {
            let input = PixelBuffer::filled(w, h, grey(100)).unwrap();
            assert_eq!(
                ditherer.dither(&input, &mut |_| {}),
                Err(DitherError::BufferTooSmall {
                    width: w,
                    height: h,
                    min: (2, 2)
                })
            );
        }
    }

    #[test]
    fn test_full_accepts_single_pixel_and_lines() {
        let ditherer = FloydSteinberg::new(Quantizer::Threshold);
        let dot = PixelBuffer::filled(1, 1, grey(200)).unwrap();
        assert_eq!(
            ditherer.dither(&dot, &mut |_| {}).unwrap().pixels(),
            &[Rgb::WHITE]
        );

        // A single column only diffuses downward (5/16 of the error)
        let column = PixelBuffer::filled(1, 3, grey(60)).unwrap();
        let out = ditherer.dither(&column, &mut |_| {}).unwrap();
        assert_eq!(out.pixels(), &[Rgb::BLACK, Rgb::BLACK, Rgb::BLACK]);
    }

    #[test]
    fn test_left_edge_does_not_wrap() {
        // Below-left of (0, 0) must be dropped, not wrapped onto (2, 1).
        let input = PixelBuffer::from_fn(3, 2, |x, y| match (x, y) {
            (0, 0) | (2, 1) => grey(100),
            _ => Rgb::BLACK,
        })
        .unwrap();
        let output = FloydSteinberg::new(Quantizer::Threshold)
            .dither(&input, &mut |_| {})
            .unwrap();
        // Without wrapping (2, 1) accumulates to ~126.6 and stays black; a
        // wrapped 3/16 of the first error (+18.75) would push it to white.
        assert_eq!(output.get(2, 1), Some(Rgb::BLACK));
    }

    #[test]
    fn test_mean_tone_preserved() {
        let input = PixelBuffer::filled(32, 32, grey(200)).unwrap();
        let output = FloydSteinberg::new(Quantizer::Threshold)
            .dither(&input, &mut |_| {})
            .unwrap();
        let white = output.pixels().iter().filter(|&&px| px == Rgb::WHITE).count();
        let ratio = white as f32 / (32.0 * 32.0);
        assert!(
            (ratio - 200.0 / 255.0).abs() < 0.05,
            "white ratio {ratio}, expected ~{}",
            200.0 / 255.0
        );
        // The first row only receives error from its left neighbor, which
        // never accumulates enough to cross the threshold.
        assert!(output.row(0).iter().all(|&px| px == Rgb::WHITE));
    }

    #[test]
    fn test_palette_quantizer_output_within_palette() {
        let palette = Arc::new(Palette::minecraft());
        let input =
            PixelBuffer::from_fn(16, 16, |x, y| Rgb::new((x * 16) as u8, (y * 16) as u8, 128))
                .unwrap();
        let output = FloydSteinberg::new(Quantizer::Palette(palette.clone()))
            .dither(&input, &mut |_| {})
            .unwrap();
        assert!(output.uses_only(&palette));
        assert_eq!(output.width(), 16);
        assert_eq!(output.height(), 16);
    }

    #[test]
    fn test_progress_per_row_then_final_100() {
        let input = PixelBuffer::filled(3, 4, grey(77)).unwrap();
        let mut seen = Vec::new();
        FloydSteinberg::new(Quantizer::Threshold)
            .dither(&input, &mut |p| seen.push(p))
            .unwrap();
        assert_eq!(seen, vec![25.0, 50.0, 75.0, 100.0, 100.0]);
    }

    #[test]
    fn test_legacy_progress_counts_visited_rows() {
        let input = PixelBuffer::filled(3, 3, grey(77)).unwrap();
        let mut seen = Vec::new();
        FloydSteinberg::new(Quantizer::Threshold)
            .options(DitherOptions::new().edges(EdgeMode::Legacy))
            .dither(&input, &mut |p| seen.push(p))
            .unwrap();
        assert_eq!(seen, vec![50.0, 100.0, 100.0]);
    }

    #[test]
    fn test_cancelled_before_start_returns_no_buffer() {
        let token = CancelToken::new();
        token.cancel();
        let input = PixelBuffer::filled(4, 4, grey(77)).unwrap();
        let mut calls = 0;
        let result = FloydSteinberg::new(Quantizer::Threshold).dither_cancellable(
            &input,
            &mut |_| calls += 1,
            &token,
        );
        assert_eq!(result, Err(DitherError::Cancelled));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_cancel_mid_pass_stops_at_next_row() {
        let token = CancelToken::new();
        let input = PixelBuffer::filled(4, 10, grey(77)).unwrap();
        let mut seen = Vec::new();
        let result = {
            let token_in_cb = token.clone();
            FloydSteinberg::new(Quantizer::Threshold).dither_cancellable(
                &input,
                &mut |p| {
                    seen.push(p);
                    if p >= 30.0 {
                        token_in_cb.cancel();
                    }
                },
                &token,
            )
        };
        assert_eq!(result, Err(DitherError::Cancelled));
        assert_eq!(seen, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_legacy_palette_edges_stay_in_palette() {
        let palette = Arc::new(Palette::minecraft());
        let input = PixelBuffer::filled(8, 8, Rgb::new(90, 140, 60)).unwrap();
        let output = FloydSteinberg::new(Quantizer::Palette(palette.clone()))
            .options(DitherOptions::new().edges(EdgeMode::Legacy))
            .dither(&input, &mut |_| {})
            .unwrap();

        assert!(output.uses_only(&palette));
    }
}
