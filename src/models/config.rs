use crate::error::ConfigError;
use crate::models::MapCount;
use map_dither::{ConversionMode, EdgeMode, Palette};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file when `--config` is absent
pub const CONFIG_ENV: &str = "MAPCRAFT_CONFIG";

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Palette override as hex colors; the Minecraft map palette when absent
    #[serde(default)]
    pub palette: Option<Vec<String>>,

    /// Conversion mode
    #[serde(default)]
    pub mode: ModeSetting,

    /// Edge handling for the dithering modes
    #[serde(default)]
    pub edges: EdgeSetting,

    /// How often the conversion task is polled for progress
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Cancel the conversion after this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Resize the input to this many 128×128 maps before converting
    #[serde(default)]
    pub maps: Option<MapCount>,
}

fn default_poll_interval_ms() -> u64 {
    100
}

/// Conversion mode as written in config files and on the command line
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ModeSetting {
    /// Nearest map color per pixel
    #[default]
    Map,
    /// Black/white Floyd-Steinberg
    Dither,
    /// Floyd-Steinberg against the map palette
    PaletteDither,
}

impl From<ModeSetting> for ConversionMode {
    fn from(mode: ModeSetting) -> Self {
        match mode {
            ModeSetting::Map => ConversionMode::Map,
            ModeSetting::Dither => ConversionMode::Dither,
            ModeSetting::PaletteDither => ConversionMode::PaletteDither,
        }
    }
}

/// Edge handling as written in config files and on the command line
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeSetting {
    /// Quantize every pixel
    #[default]
    Full,
    /// Leave the last row and column unquantized
    Legacy,
}

impl From<EdgeSetting> for EdgeMode {
    fn from(edges: EdgeSetting) -> Self {
        match edges {
            EdgeSetting::Full => EdgeMode::Full,
            EdgeSetting::Legacy => EdgeMode::Legacy,
        }
    }
}

impl AppConfig {
    /// Pick the config path: the explicit one, else `MAPCRAFT_CONFIG`
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.palette()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration, falling back to defaults on any problem
    pub fn load(explicit: Option<&Path>) -> Self {
        let Some(path) = Self::resolve_path(explicit) else {
            tracing::debug!("No config file given, using defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    mode = ?config.mode,
                    custom_palette = config.palette.is_some(),
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        mode: Option<ModeSetting>,
        edges: Option<EdgeSetting>,
        timeout_secs: Option<u64>,
        maps: Option<MapCount>,
    ) -> Self {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(edges) = edges {
            self.edges = edges;
        }
        if timeout_secs.is_some() {
            self.timeout_secs = timeout_secs;
        }
        if maps.is_some() {
            self.maps = maps;
        }
        self
    }

    /// Build the active palette
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        match &self.palette {
            Some(hex) => Ok(Palette::from_hex(hex.as_slice())?),
            None => Ok(Palette::minecraft()),
        }
    }

    /// Poll interval for the conversion task, never zero
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: None,
            mode: ModeSetting::default(),
            edges: EdgeSetting::default(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: None,
            maps: None,
        }
    }
}
