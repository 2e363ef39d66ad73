//! Tab-separated row reader for feature tables.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;

use crate::parser::util::{open_input, strip_line_end};

/// Split tab-separated lines into rows of fields.
///
/// Blank lines and lines starting with `#` are skipped. Everything else is
/// returned as-is, so loaders decide which rows are well formed.
pub fn parse_rows_reader<R: BufRead>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for line_result in reader.lines() {
        let line = line_result.context("Failed to read table line")?;
        let line = strip_line_end(&line);

        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        rows.push(line.split('\t').map(str::to_string).collect());
    }

    Ok(rows)
}

/// Read all rows of a (possibly gzipped) tab-separated file.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let reader = open_input(path)?;
    parse_rows_reader(reader).with_context(|| format!("Failed to parse {}", path.display()))
}
