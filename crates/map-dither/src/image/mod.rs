//! Pixel buffer type shared by every pass.
//!
//! [`PixelBuffer`] holds decoded pixels; the core never parses or writes
//! image file formats.

mod pixel_buffer;

pub use pixel_buffer::PixelBuffer;
