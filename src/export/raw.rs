//! RAW format export for game engine compatibility.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::png::{to_row_major, ExportError};
use crate::terrain::HeightField;

/// RAW export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFormat {
    /// One byte per sample.
    R8,
    /// 16-bit unsigned integer, little-endian (Unity default).
    #[default]
    R16LittleEndian,
    /// 16-bit unsigned integer, big-endian.
    R16BigEndian,
}

/// Exports a height field as headerless rows of samples, top row first.
///
/// 16-bit formats widen each sample by `* 257`.
pub fn export_field_raw(field: &HeightField, path: &Path, format: RawFormat) -> Result<(), ExportError> {
    let rows = to_row_major(field.width(), field.height(), field.samples())?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match format {
        RawFormat::R8 => writer.write_all(&rows)?,
        RawFormat::R16LittleEndian => {
            for &sample in &rows {
                writer.write_all(&(sample as u16 * 257).to_le_bytes())?;
            }
        }
        RawFormat::R16BigEndian => {
            for &sample in &rows {
                writer.write_all(&(sample as u16 * 257).to_be_bytes())?;
            }
        }
    }

    writer.flush()?;
    log::info!("wrote {:?} RAW to {}", format, path.display());
    Ok(())
}

/// Returns the expected file size for a RAW export.
pub fn expected_file_size(width: u32, height: u32, format: RawFormat) -> u64 {
    let pixels = (width as u64) * (height as u64);
    match format {
        RawFormat::R8 => pixels,
        RawFormat::R16LittleEndian | RawFormat::R16BigEndian => pixels * 2,
    }
}
