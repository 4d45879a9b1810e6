//! Deterministic PNG writer.
//!
//! Uses fixed compression settings so that the same fields always encode
//! to byte-identical files.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::field::{ScalarField, VectorField3};
use crate::packing::PackedImage;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            // No filtering keeps the output independent of adaptive heuristics.
            filter: FilterType::NoFilter,
        }
    }
}

/// Write raw 8-bit pixel data to any writer.
pub fn write_raw_to_writer<W: Write>(
    data: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let channels = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(PngError::InvalidDimensions(
                "Indexed color not supported".into(),
            ))
        }
    };
    let expected_size = width as usize * height as usize * channels;
    if width == 0 || height == 0 || data.len() != expected_size {
        return Err(PngError::InvalidDimensions(format!(
            "Expected {} bytes for {}x{} {:?}, got {}",
            expected_size,
            width,
            height,
            color_type,
            data.len()
        )));
    }

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(data)?;

    Ok(())
}

/// Write raw 8-bit pixel data to a file.
pub fn write_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
    path: &Path,
    config: &PngConfig,
) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_raw_to_writer(data, width, height, color_type, writer, config)
}

/// Encode raw pixel data into memory and return it with its hash.
pub fn write_raw_to_vec_with_hash(
    data: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut out = Vec::new();
    write_raw_to_writer(data, width, height, color_type, &mut out, config)?;
    let hash = hash_png(&out);
    Ok((out, hash))
}

/// Encode a scalar field as 8-bit grayscale.
pub fn write_grayscale_to_vec_with_hash(
    field: &ScalarField,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    write_raw_to_vec_with_hash(
        &field.to_bytes(),
        field.width,
        field.height,
        ColorType::Grayscale,
        config,
    )
}

/// Encode a vector field as 8-bit RGB.
pub fn write_rgb_to_vec_with_hash(
    field: &VectorField3,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    write_raw_to_vec_with_hash(
        &field.to_rgb8(),
        field.width,
        field.height,
        ColorType::Rgb,
        config,
    )
}

/// Encode a packed image as 8-bit RGB.
pub fn write_packed_to_vec_with_hash(
    image: &PackedImage,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    write_raw_to_vec_with_hash(&image.data, image.width, image.height, ColorType::Rgb, config)
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
