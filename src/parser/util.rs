//! Utility functions for opening input files.

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open a file for buffered reading, decompressing gzip input transparently.
///
/// Compression is detected from the leading magic bytes, so `.gz` files and
/// bgzip output are handled whatever their extension.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let is_gzip = reader
        .fill_buf()
        .with_context(|| format!("Failed to read {}", path.display()))?
        .starts_with(&GZIP_MAGIC);

    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Strip a trailing line terminator without touching other whitespace.
///
/// Tab-separated inputs may legitimately end in empty fields, so lines must
/// not be trimmed with `trim_end`.
pub fn strip_line_end(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Read a whole file into memory, decompressing if needed.
pub fn read_to_string(path: &Path) -> Result<String> {
    let mut content = String::new();
    open_input(path)?
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content)
}
