//! Export module for saving height fields to image and raw files.
//!
//! Supports 8- and 16-bit grayscale PNG, and headerless RAW in 8-bit or
//! 16-bit little/big-endian layouts.

mod png;
mod raw;

pub use png::{export_field_png, to_row_major, ExportError, PngBitDepth, PngExportOptions};
pub use raw::{expected_file_size, export_field_raw, RawFormat};
