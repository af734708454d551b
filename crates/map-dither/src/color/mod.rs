//! Color type
//!
//! Map art works directly on 8-bit sRGB values: palette matching and error
//! diffusion both happen in plain RGB, without gamma decoding.
//!
//! # Example
//!
//! ```
//! use map_dither::Rgb;
//!
//! let water = Rgb::new(64, 64, 255);
//! assert_eq!(water.to_string(), "#4040ff");
//! assert_eq!(water.distance_sq(Rgb::new(64, 64, 250)), 25);
//! ```

mod rgb;

pub use rgb::Rgb;
