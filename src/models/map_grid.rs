use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Edge length of one Minecraft map in pixels
pub const MAP_TILE_SIZE: usize = 128;

/// Largest number of maps accepted along one side
pub const MAX_MAPS_PER_SIDE: u32 = 20;

/// Target size in whole maps, written `WxH` (e.g. `2x3`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MapCount {
    pub x: u32,
    pub y: u32,
}

impl MapCount {
    pub fn new(x: u32, y: u32) -> Result<Self, ConfigError> {
        let valid = 1..=MAX_MAPS_PER_SIDE;
        if !valid.contains(&x) || !valid.contains(&y) {
            return Err(ConfigError::MapCount(format!("{x}x{y}")));
        }
        Ok(Self { x, y })
    }

    /// Pixel size of the map area
    pub fn pixel_dimensions(&self) -> (usize, usize) {
        (
            self.x as usize * MAP_TILE_SIZE,
            self.y as usize * MAP_TILE_SIZE,
        )
    }
}

impl FromStr for MapCount {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::MapCount(s.to_string());
        let (x, y) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Self::new(x, y)
    }
}

impl TryFrom<String> for MapCount {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MapCount> for String {
    fn from(maps: MapCount) -> Self {
        maps.to_string()
    }
}

impl fmt::Display for MapCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// How an image lays out over 128×128 map tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapGrid {
    pub width: usize,
    pub height: usize,
}

impl MapGrid {
    pub fn for_dimensions(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Maps needed horizontally (partial tiles count)
    pub fn tiles_x(&self) -> usize {
        self.width.div_ceil(MAP_TILE_SIZE)
    }

    /// Maps needed vertically (partial tiles count)
    pub fn tiles_y(&self) -> usize {
        self.height.div_ceil(MAP_TILE_SIZE)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles_x() * self.tiles_y()
    }

    /// Whether both dimensions are whole multiples of the tile size
    pub fn is_aligned(&self) -> bool {
        self.width % MAP_TILE_SIZE == 0 && self.height % MAP_TILE_SIZE == 0
    }

    /// Smallest tile-aligned size that contains the image
    pub fn padded_dimensions(&self) -> (usize, usize) {
        (self.tiles_x() * MAP_TILE_SIZE, self.tiles_y() * MAP_TILE_SIZE)
    }

    /// Log the layout, warning when the edge maps would be partial
    pub fn log(&self) {
        if self.is_aligned() {
            tracing::info!(
                width = self.width,
                height = self.height,
                maps_x = self.tiles_x(),
                maps_y = self.tiles_y(),
                "Image spans {} map(s)",
                self.tile_count()
            );
        } else {
            let (padded_w, padded_h) = self.padded_dimensions();
            tracing::warn!(
                width = self.width,
                height = self.height,
                padded_width = padded_w,
                padded_height = padded_h,
                "Dimensions are not multiples of {MAP_TILE_SIZE}; edge maps will be partially filled (use --maps to resize)"
            );
        }
    }
}
