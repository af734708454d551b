use map_dither::{DitherError, MapError, PaletteError, TaskFailure};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG color type: {0}")]
    UnsupportedColorType(String),

    #[error("Resize error: {0}")]
    Resize(String),

    #[error("Invalid pixel data: {0}")]
    Pixels(#[from] DitherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid palette: {0}")]
    Palette(#[from] PaletteError),

    #[error("Invalid map count '{0}': expected WxH with each side 1..={max}", max = crate::models::MAX_MAPS_PER_SIDE)]
    MapCount(String),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Conversion failed: {0}")]
    Map(#[from] MapError),

    #[error("Conversion worker failed: {0}")]
    Worker(String),

    #[error("Conversion timed out after {}s", .0.as_secs_f32())]
    TimedOut(Duration),

    #[error("Conversion cancelled")]
    Cancelled,
}

impl From<TaskFailure<MapError>> for ConvertError {
    fn from(failure: TaskFailure<MapError>) -> Self {
        match failure {
            TaskFailure::Error(e) => ConvertError::Map(e),
            TaskFailure::Panicked(msg) => ConvertError::Worker(format!("panicked: {msg}")),
            TaskFailure::Spawn(msg) => ConvertError::Worker(msg),
        }
    }
}
