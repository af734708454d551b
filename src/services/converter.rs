use crate::error::{ConfigError, ConvertError, ImageError};
use crate::models::{AppConfig, MapCount, MapGrid};
use crate::services::image_io;
use map_dither::{MapDitherer, MapError, PixelBuffer, TaskHandle, TaskResult, TaskState};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Summary of a finished file conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub grid: MapGrid,
    pub colors_used: usize,
    pub elapsed: Duration,
}

/// Drives a map conversion on a worker thread from async code
pub struct ConvertService {
    ditherer: MapDitherer,
    poll_interval: Duration,
    timeout: Option<Duration>,
    maps: Option<MapCount>,
}

impl ConvertService {
    pub fn new(ditherer: MapDitherer, poll_interval: Duration, timeout: Option<Duration>) -> Self {
        Self {
            ditherer,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            timeout,
            maps: None,
        }
    }

    /// Resize file inputs to a whole number of maps before converting
    pub fn maps(mut self, maps: Option<MapCount>) -> Self {
        self.maps = maps;
        self
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let ditherer = MapDitherer::new(config.palette()?)
            .mode(config.mode.into())
            .edges(config.edges.into());
        Ok(Self::new(ditherer, config.poll_interval(), config.timeout()).maps(config.maps))
    }

    pub fn ditherer(&self) -> &MapDitherer {
        &self.ditherer
    }

    /// Convert `input`, cancelling on Ctrl-C or when the timeout elapses
    pub async fn convert(&self, input: PixelBuffer) -> Result<PixelBuffer, ConvertError> {
        self.convert_until(input, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(%e, "Cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Convert `input`, cancelling when `shutdown` completes or the timeout elapses
    pub async fn convert_until<F>(
        &self,
        input: PixelBuffer,
        shutdown: F,
    ) -> Result<PixelBuffer, ConvertError>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let mut handle = self.ditherer.spawn(input);

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let timeout = self.timeout;
        let deadline = async move {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);
        tokio::pin!(shutdown);

        let mut progress = ProgressLog::default();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    progress.record(&handle);
                    if let Some(result) = handle.poll() {
                        return finish(result, started);
                    }
                    if handle.state() == TaskState::Cancelled {
                        return Err(ConvertError::Cancelled);
                    }
                }
                _ = &mut deadline => {
                    let limit = timeout.unwrap_or_default();
                    tracing::warn!(timeout_secs = limit.as_secs_f32(), "Conversion timed out, cancelling");
                    return stop(&mut handle, started, ConvertError::TimedOut(limit));
                }
                _ = &mut shutdown => {
                    tracing::warn!("Interrupted, cancelling conversion");
                    return stop(&mut handle, started, ConvertError::Cancelled);
                }
            }
        }
    }

    /// Read a PNG, resize it to whole maps if configured, convert it and
    /// write the result as PNG
    pub async fn convert_file(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ConversionSummary, ConvertError> {
        let started = Instant::now();
        let input_path: PathBuf = input.to_path_buf();
        let maps = self.maps;
        let pixels = tokio::task::spawn_blocking(move || -> Result<PixelBuffer, ImageError> {
            let pixels = image_io::read_png(&input_path)?;
            match maps {
                Some(maps) => {
                    tracing::info!(
                        from_width = pixels.width(),
                        from_height = pixels.height(),
                        %maps,
                        "Resizing to whole maps"
                    );
                    image_io::resize_to_maps(&pixels, maps)
                }
                None => Ok(pixels),
            }
        })
        .await
        .map_err(|e| ConvertError::Worker(format!("Decode task failed: {e}")))??;

        let grid = MapGrid::for_dimensions(pixels.width(), pixels.height());
        tracing::info!(
            input = %input.display(),
            width = grid.width,
            height = grid.height,
            mode = ?self.ditherer.conversion_mode(),
            "Converting image"
        );
        grid.log();

        let converted = self.convert(pixels).await?;
        let colors_used = count_colors(&converted);

        let output_path: PathBuf = output.to_path_buf();
        tokio::task::spawn_blocking(move || image_io::write_png(&output_path, &converted))
            .await
            .map_err(|e| ConvertError::Worker(format!("Encode task failed: {e}")))??;

        let summary = ConversionSummary {
            grid,
            colors_used,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            output = %output.display(),
            colors_used,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Wrote converted image"
        );
        Ok(summary)
    }
}

fn finish(
    result: TaskResult<PixelBuffer, MapError>,
    started: Instant,
) -> Result<PixelBuffer, ConvertError> {
    match result {
        Ok(buffer) => {
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Conversion finished"
            );
            Ok(buffer)
        }
        Err(failure) => {
            tracing::error!(%failure, "Conversion failed");
            Err(failure.into())
        }
    }
}

/// Cancel the task; if it already finished, deliver its result instead
fn stop(
    handle: &mut TaskHandle<PixelBuffer, MapError>,
    started: Instant,
    reason: ConvertError,
) -> Result<PixelBuffer, ConvertError> {
    if !handle.cancel() {
        if let Some(result) = handle.poll() {
            return finish(result, started);
        }
    }
    Err(reason)
}

fn count_colors(buffer: &PixelBuffer) -> usize {
    let mut seen: Vec<_> = buffer.pixels().to_vec();
    seen.sort_unstable_by_key(|px| px.to_bytes());
    seen.dedup();
    seen.len()
}

/// Logs progress at 10% steps
#[derive(Default)]
struct ProgressLog {
    last_step: Option<u32>,
}

impl ProgressLog {
    fn record(&mut self, handle: &TaskHandle<PixelBuffer, MapError>) {
        for report in handle.drain_progress() {
            let step = (report.percent / 10.0).floor() as u32;
            if self.last_step.is_some_and(|last| step <= last) {
                continue;
            }
            self.last_step = Some(step);
            tracing::info!(percent = report.percent.round() as u32, "Converting");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_dither::{ConversionMode, Rgb};

    fn service(mode: ConversionMode, timeout: Option<Duration>) -> ConvertService {
        ConvertService::new(
            MapDitherer::minecraft().mode(mode),
            Duration::from_millis(5),
            timeout,
        )
    }

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            Rgb::new((x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8)
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_convert_completes() {
        let service = service(ConversionMode::PaletteDither, None);
        let output = service
            .convert_until(gradient(64, 32), std::future::pending())
            .await
            .unwrap();
        assert_eq!((output.width(), output.height()), (64, 32));
        assert!(output.uses_only(service.ditherer().palette()));
    }

    #[tokio::test]
    async fn test_shutdown_cancels() {
        let service = service(ConversionMode::PaletteDither, None);
        let result = service
            .convert_until(gradient(2048, 2048), std::future::ready(()))
            .await;
        assert!(matches!(result, Err(ConvertError::Cancelled)));
    }

    #[tokio::test]
    async fn test_timeout_cancels() {
        let service = service(ConversionMode::PaletteDither, Some(Duration::ZERO));
        let result = service
            .convert_until(gradient(2048, 2048), std::future::pending())
            .await;
        assert!(matches!(result, Err(ConvertError::TimedOut(d)) if d == Duration::ZERO));
    }

    #[tokio::test]
    async fn test_core_error_is_reported() {
        let service = ConvertService::new(
            MapDitherer::minecraft()
                .mode(ConversionMode::Dither)
                .edges(map_dither::EdgeMode::Legacy),
            Duration::from_millis(1),
            None,
        );
        let input = PixelBuffer::filled(1, 4, Rgb::WHITE).unwrap();
        let result = service.convert_until(input, std::future::pending()).await;
        match result {
            Err(ConvertError::Map(e)) => assert!(e.is_buffer_too_small()),
            other => panic!("Expected Map error, got {:?}", other.map(|b| b.width())),
        }
    }

    #[test]
    fn test_from_config_uses_settings() {
        let config = AppConfig::from_yaml_str(
            "palette: ['#000000', '#ffffff']\nmode: dither\nedges: legacy\ntimeout_secs: 3\nmaps: 2x2",
        )
        .unwrap();
        let service = ConvertService::from_config(&config).unwrap();
        assert_eq!(service.ditherer().conversion_mode(), ConversionMode::Dither);
        assert_eq!(service.ditherer().edge_mode(), map_dither::EdgeMode::Legacy);
        assert_eq!(service.ditherer().palette().len(), 2);
        assert_eq!(service.timeout, Some(Duration::from_secs(3)));
        assert_eq!(service.maps, MapCount::new(2, 2).ok());
    }

    #[test]
    fn test_count_colors() {
        let buffer = PixelBuffer::from_fn(4, 4, |x, _| if x < 2 { Rgb::BLACK } else { Rgb::WHITE })
            .unwrap();
        assert_eq!(count_colors(&buffer), 2);
    }
}
