//! Public API for the map-dither crate.
//!
//! This module provides the high-level API: [`MapDitherer`] builder,
//! [`ConversionMode`] selection and the unified [`MapError`] type.

mod builder;
mod error;

pub use builder::{ConversionMode, MapDitherer};
pub use error::MapError;
