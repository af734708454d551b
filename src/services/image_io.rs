use crate::error::ImageError;
use crate::models::MapCount;
use image::imageops::FilterType;
use map_dither::PixelBuffer;
use std::io::Cursor;
use std::path::Path;

/// Decode a PNG into RGB pixels.
///
/// Palette, grayscale and 16-bit images are expanded to 8-bit channels.
/// Alpha is discarded, not composited.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::UnsupportedColorType(format!(
            "{:?} at {:?} bits",
            info.color_type, info.bit_depth
        )));
    }

    let rgb: Vec<u8> = match info.color_type {
        png::ColorType::Rgb => data.to_vec(),
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0]])
            .collect(),
        other => return Err(ImageError::UnsupportedColorType(format!("{other:?}"))),
    };

    Ok(PixelBuffer::from_rgb_bytes(
        &rgb,
        info.width as usize,
        info.height as usize,
    )?)
}

/// Encode pixels as an 8-bit RGB PNG
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    let width = u32::try_from(buffer.width())
        .map_err(|_| ImageError::PngEncode(format!("width {} too large", buffer.width())))?;
    let height = u32::try_from(buffer.height())
        .map_err(|_| ImageError::PngEncode(format!("height {} too large", buffer.height())))?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&buffer.to_rgb_bytes())
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Resample to exactly `maps` worth of 128×128 tiles with a Lanczos filter.
///
/// Aspect ratio is not preserved; the image is stretched to fill the grid.
pub fn resize_to_maps(buffer: &PixelBuffer, maps: MapCount) -> Result<PixelBuffer, ImageError> {
    let (width, height) = maps.pixel_dimensions();
    if (buffer.width(), buffer.height()) == (width, height) {
        return Ok(buffer.clone());
    }

    let to_u32 = |v: usize| {
        u32::try_from(v).map_err(|_| ImageError::Resize(format!("dimension {v} too large")))
    };
    let source = image::RgbImage::from_raw(
        to_u32(buffer.width())?,
        to_u32(buffer.height())?,
        buffer.to_rgb_bytes(),
    )
    .ok_or_else(|| ImageError::Resize("pixel data does not match dimensions".to_string()))?;

    let resized = image::imageops::resize(
        &source,
        to_u32(width)?,
        to_u32(height)?,
        FilterType::Lanczos3,
    );
    Ok(PixelBuffer::from_rgb_bytes(resized.as_raw(), width, height)?)
}

pub fn read_png(path: &Path) -> Result<PixelBuffer, ImageError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

pub fn write_png(path: &Path, buffer: &PixelBuffer) -> Result<(), ImageError> {
    let bytes = encode_png(buffer)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
