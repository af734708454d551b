pub mod config;
pub mod map_grid;

pub use config::{AppConfig, EdgeSetting, ModeSetting, CONFIG_ENV};
pub use map_grid::{MapCount, MapGrid, MAP_TILE_SIZE, MAX_MAPS_PER_SIDE};
