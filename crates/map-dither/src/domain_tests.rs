//! Domain-critical regression tests for map-dither.
//!
//! These tests cut across modules. Each one documents the behavior it
//! guards so a failure points at the broken contract, not just the line.

#[cfg(test)]
mod domain_tests {
    use std::sync::mpsc;
    use std::sync::Arc;

    use crate::api::{ConversionMode, MapDitherer};
    use crate::color::Rgb;
    use crate::dither::{
        Dither, DitherError, DitherOptions, EdgeMode, FloydSteinberg, NearestRemap, Quantizer,
    };
    use crate::image::PixelBuffer;
    use crate::palette::{nearest, Palette, PaletteError};
    use crate::task::{CancellableTask, TaskState};
    use pretty_assertions::assert_eq;

    fn grey(v: u8) -> Rgb {
        Rgb::new(v, v, v)
    }

    fn sample_colors() -> Vec<Rgb> {
        let steps = [0u8, 31, 64, 100, 127, 128, 160, 199, 230, 255];
        let mut colors = Vec::new();
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    colors.push(Rgb::new(r, g, b));
                }
            }
        }
        colors
    }

    // ========================================================================
    // Matching contract
    // ========================================================================

    /// If this breaks, it means: matching returned a color that is not in
    /// the palette, e.g. an interpolated or default value.
    #[test]
    fn test_nearest_is_closed_over_palette() {
        let palette = Palette::minecraft();
        for c in sample_colors() {
            let matched = palette.nearest(c);
            assert!(
                palette.contains(matched),
                "{} mapped to {} which is not a palette entry",
                c,
                matched
            );
        }
    }

    /// If this breaks, it means: a pixel already equal to a palette entry
    /// is being moved to a different entry.
    #[test]
    fn test_palette_entries_are_fixed_points() {
        let palette = Palette::minecraft();
        for &entry in palette.colors() {
            assert_eq!(palette.nearest(entry), entry);
        }
    }

    /// If this breaks, it means: equidistant entries no longer resolve to
    /// the first one listed, so output depends on something other than
    /// palette order.
    #[test]
    fn test_ties_resolve_to_first_entry_repeatably() {
        // (100,100,100) is 100 away (squared) from both entries
        let colors = [grey(90), grey(110)];
        let reversed = [grey(110), grey(90)];
        for _ in 0..10 {
            assert_eq!(nearest(grey(100), &colors), Ok(grey(90)));
            assert_eq!(nearest(grey(100), &reversed), Ok(grey(110)));
        }
    }

    /// If this breaks, it means: an empty palette silently produces a zero
    /// color instead of failing.
    #[test]
    fn test_empty_palette_is_an_error_everywhere() {
        assert_eq!(nearest(grey(1), &[]), Err(PaletteError::EmptyPalette));
        assert_eq!(Palette::new(&[]), Err(PaletteError::EmptyPalette));
        assert!(matches!(
            Quantizer::from_colors(&[]),
            Err(DitherError::Palette(PaletteError::EmptyPalette))
        ));
    }

    // ========================================================================
    // Error diffusion
    // ========================================================================

    /// If this breaks, it means: a flat light grey no longer maps to white
    /// without diffusion, or diffusion stopped preserving the average tone.
    ///
    /// Remapping (200,200,200) gives pure white everywhere. Diffusing it
    /// cannot: each white pixel carries -55 of error, and roughly a fifth of
    /// the pixels must turn black to keep the mean at 200/255. The first row
    /// only receives error from its left neighbor, which never pulls a pixel
    /// below the threshold, so it stays white.
    #[test]
    fn test_uniform_light_grey() {
        let input = PixelBuffer::filled(32, 32, grey(200)).unwrap();

        let bw = Arc::new(Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap());
        let remapped = NearestRemap::new(bw).dither(&input, &mut |_| {}).unwrap();
        assert!(remapped.pixels().iter().all(|&px| px == Rgb::WHITE));

        let dithered = FloydSteinberg::new(Quantizer::Threshold)
            .dither(&input, &mut |_| {})
            .unwrap();
        assert!(dithered.row(0).iter().all(|&px| px == Rgb::WHITE));

        let white = dithered
            .pixels()
            .iter()
            .filter(|&&px| px == Rgb::WHITE)
            .count();
        let ratio = white as f64 / dithered.pixels().len() as f64;
        assert!(
            (ratio - 200.0 / 255.0).abs() < 0.05,
            "white ratio {:.3} drifted from the input tone",
            ratio
        );
    }

    /// If this breaks, it means: already-quantized input accumulates error
    /// somewhere, so re-dithering the output changes it.
    #[test]
    fn test_black_white_checkerboard_is_idempotent() {
        let input = PixelBuffer::from_fn(9, 7, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb::BLACK
            } else {
                Rgb::WHITE
            }
        })
        .unwrap();

        for edges in [EdgeMode::Full, EdgeMode::Legacy] {
            let ditherer =
                FloydSteinberg::new(Quantizer::Threshold).options(DitherOptions::new().edges(edges));
            let once = ditherer.dither(&input, &mut |_| {}).unwrap();
            let twice = ditherer.dither(&once, &mut |_| {}).unwrap();
            assert_eq!(once, input, "{:?}", edges);
            assert_eq!(twice, once, "{:?}", edges);
        }
    }

    /// If this breaks, it means: the 4x4 alternating case no longer lands
    /// every pixel on its own side of the threshold.
    #[test]
    fn test_alternating_4x4_end_to_end() {
        let input = PixelBuffer::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                grey(10)
            } else {
                grey(250)
            }
        })
        .unwrap();

        let output = MapDitherer::minecraft()
            .mode(ConversionMode::Dither)
            .convert(&input, &mut |_| {})
            .unwrap();

        for y in 0..4 {
            for x in 0..4 {
                let expected = if input.get(x, y).map_or(0, |px| px.r) >= 128 {
                    Rgb::WHITE
                } else {
                    Rgb::BLACK
                };
                assert_eq!(output.get(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    // ========================================================================
    // Progress and cancellation
    // ========================================================================

    /// If this breaks, it means: a pass reported progress out of order or
    /// finished without a final 100.
    #[test]
    fn test_progress_is_monotonic_and_ends_at_100() {
        let modes = [
            ConversionMode::Map,
            ConversionMode::Dither,
            ConversionMode::PaletteDither,
        ];
        for mode in modes {
            for edges in [EdgeMode::Full, EdgeMode::Legacy] {
                for height in [2, 3, 7, 64] {
                    let input = PixelBuffer::filled(5, height, Rgb::new(90, 140, 30)).unwrap();
                    let mut seen = Vec::new();
                    MapDitherer::minecraft()
                        .mode(mode)
                        .edges(edges)
                        .convert(&input, &mut |p| seen.push(p))
                        .unwrap();

                    assert!(
                        seen.windows(2).all(|w| w[0] <= w[1]),
                        "{:?}/{:?}/{}: {:?}",
                        mode,
                        edges,
                        height,
                        seen
                    );
                    assert_eq!(seen.last().copied(), Some(100.0));
                }
            }
        }
    }

    /// If this breaks, it means: a task cancelled before it ran still
    /// executed or delivered an outcome.
    #[test]
    fn test_cancel_before_running_delivers_nothing() {
        let input = PixelBuffer::filled(16, 16, grey(70)).unwrap();
        let task = CancellableTask::new(move |ctx| {
            let mut progress = ctx.progress_fn();
            FloydSteinberg::new(Quantizer::Threshold).dither_cancellable(
                &input,
                &mut progress,
                ctx.cancel_token(),
            )
        });
        task.cancel();
        assert_eq!(task.state(), TaskState::Cancelled);

        let mut handle = task.submit();
        assert!(handle.poll().is_none());
        assert!(handle.progress().is_none());
        assert!(handle.wait().is_none());
    }

    /// If this breaks, it means: cancelling mid-run let a stale result
    /// through, or the pass ignored the token.
    #[test]
    fn test_cancel_mid_run_delivers_nothing() {
        let (started_tx, started_rx) = mpsc::channel();
        let (resume_tx, resume_rx) = mpsc::channel::<()>();
        let input = PixelBuffer::filled(8, 50, grey(70)).unwrap();

        let mut handle = CancellableTask::new(move |ctx| {
            let mut first = true;
            let mut on_progress = |p: f32| {
                ctx.report(p, None);
                if first {
                    first = false;
                    let _ = started_tx.send(());
                    let _ = resume_rx.recv();
                }
            };
            FloydSteinberg::new(Quantizer::Threshold).dither_cancellable(
                &input,
                &mut on_progress,
                ctx.cancel_token(),
            )
        })
        .submit();

        started_rx.recv().unwrap();
        assert_eq!(handle.state(), TaskState::Running);
        assert!(handle.cancel());
        resume_tx.send(()).unwrap();

        assert!(handle.poll().is_none());
        let last = handle.progress().map(|r| r.percent);
        assert_eq!(last, Some(2.0));
        assert_eq!(handle.state(), TaskState::Cancelled);
        assert!(handle.wait().is_none());
    }
}
