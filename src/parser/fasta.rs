//! FASTA reader for reference and marker sequences.
//!
//! Headers start with `>`; the record name is the first whitespace-separated
//! token. Sequence lines are concatenated with surrounding whitespace removed.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::io::BufRead;
use std::path::Path;
use tracing::warn;

use crate::parser::util::open_input;
use crate::types::{Marker, Reference};

/// Parse FASTA records from a reader, keyed by name in file order.
///
/// A repeated name replaces the earlier record's sequence. Sequence lines
/// appearing before the first header are ignored.
pub fn parse_fasta_reader<R: BufRead>(reader: R) -> Result<IndexMap<String, Vec<u8>>> {
    let mut records: IndexMap<String, Vec<u8>> = IndexMap::new();
    let mut current: Option<String> = None;
    let mut orphan_lines = 0usize;

    for line_result in reader.lines() {
        let line = line_result.context("Failed to read FASTA line")?;
        let line = line.trim();

        if let Some(header) = line.strip_prefix('>') {
            let name = header.split_whitespace().next().unwrap_or("").to_string();
            if records.insert(name.clone(), Vec::new()).is_some() {
                warn!(record = %name, "duplicate FASTA record, keeping the last one");
            }
            current = Some(name);
            continue;
        }

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        match current.as_ref().and_then(|name| records.get_mut(name)) {
            Some(sequence) => sequence.extend_from_slice(line.as_bytes()),
            None => orphan_lines += 1,
        }
    }

    if orphan_lines > 0 {
        warn!(lines = orphan_lines, "ignored sequence lines before the first FASTA header");
    }

    Ok(records)
}

/// Read every reference record of a FASTA file.
///
/// Empty records are kept so the caller can reject them.
pub fn read_references(path: &Path) -> Result<Vec<Reference>> {
    let reader = open_input(path)?;
    let records = parse_fasta_reader(reader)
        .with_context(|| format!("Failed to parse reference {}", path.display()))?;

    Ok(records
        .into_iter()
        .map(|(name, sequence)| Reference::new(name, sequence))
        .collect())
}

/// Read markers from a FASTA file, dropping records without sequence.
pub fn read_markers(path: &Path) -> Result<Vec<Marker>> {
    let reader = open_input(path)?;
    let records = parse_fasta_reader(reader)
        .with_context(|| format!("Failed to parse markers {}", path.display()))?;

    Ok(markers_from_records(records))
}

fn markers_from_records(records: IndexMap<String, Vec<u8>>) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(records.len());
    for (id, sequence) in records {
        if sequence.is_empty() {
            warn!(marker = %id, "skipping marker without sequence");
            continue;
        }
        markers.push(Marker::new(id, String::from_utf8_lossy(&sequence).into_owned()));
    }
    markers
}
