pub mod converter;
pub mod image_io;

pub use converter::{ConversionSummary, ConvertService};
pub use image_io::{decode_png, encode_png, read_png, resize_to_maps, write_png};
