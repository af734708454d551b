//! Mapcraft - Minecraft map art converter
//!
//! Reads PNG images, reduces them to map colors with `map-dither`, and
//! writes the result back as PNG.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;
