//! Output file naming.
//!
//! Labeled copies never overwrite their source: the input's extension (if
//! any) is replaced by `.altered.<ext>`, where `<ext>` follows the output
//! format rather than the input format.
//!
//! - `photos/dawn.png` + JPEG → `photos/dawn.altered.jpg`
//! - `scan.tiff.bmp` + PNG → `scan.tiff.altered.png`
//! - `README` + BMP → `README.altered.bmp`

use crate::types::OutputFormat;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Path of the labeled copy of `input`.
pub fn altered_path(input: &Path, format: OutputFormat) -> PathBuf {
    let base = match input.file_stem() {
        Some(stem) if input.extension().is_some() => input.with_file_name(stem),
        _ => input.to_path_buf(),
    };
    let mut name = OsString::from(base.as_os_str());
    name.push(".altered.");
    name.push(format.extension());
    PathBuf::from(name)
}
