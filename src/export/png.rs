//! PNG export functionality for height fields.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ImageEncoder;
use thiserror::Error;

use crate::terrain::HeightField;

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Height field is empty ({0}x{1})")]
    EmptyField(u32, u32),
    #[error("Sample count {actual} does not match {width}x{height}")]
    DataLength {
        width: u32,
        height: u32,
        actual: usize,
    },
}

/// Sample depth of the written image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngBitDepth {
    #[default]
    Eight,
    /// Each 8-bit sample is widened by `* 257` so 255 maps to 65535.
    Sixteen,
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    pub bit_depth: PngBitDepth,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            bit_depth: PngBitDepth::Eight,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    pub fn sixteen_bit() -> Self {
        Self {
            bit_depth: PngBitDepth::Sixteen,
            ..Default::default()
        }
    }
}

/// Reorders column-major samples (`x * height + y`) into image rows.
pub fn to_row_major(width: u32, height: u32, samples: &[u8]) -> Result<Vec<u8>, ExportError> {
    let expected = (width as usize) * (height as usize);
    if samples.len() != expected {
        return Err(ExportError::DataLength {
            width,
            height,
            actual: samples.len(),
        });
    }
    if expected == 0 {
        return Err(ExportError::EmptyField(width, height));
    }

    let (w, h) = (width as usize, height as usize);
    let mut rows = vec![0u8; expected];
    for x in 0..w {
        for y in 0..h {
            rows[y * w + x] = samples[x * h + y];
        }
    }
    Ok(rows)
}

/// Exports a height field as a grayscale PNG, one pixel per sample.
///
/// Pixel `(x, y)` of the image holds sample `(x, y)` of the field.
pub fn export_field_png(
    field: &HeightField,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    let (width, height) = (field.width(), field.height());
    let rows = to_row_major(width, height, field.samples())?;

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    match options.bit_depth {
        PngBitDepth::Eight => {
            encoder.write_image(&rows, width, height, image::ExtendedColorType::L8)?;
        }
        PngBitDepth::Sixteen => {
            let wide: Vec<u16> = rows.iter().map(|&s| s as u16 * 257).collect();
            let byte_slice: &[u8] = bytemuck::cast_slice(&wide);
            encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;
        }
    }

    log::info!("wrote {}x{} PNG to {}", width, height, path.display());
    Ok(())
}
