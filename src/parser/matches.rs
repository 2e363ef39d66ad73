//! Reader for the match-stage table.
//!
//! The table carries no chromosome column, so every match read back gets the
//! chromosome supplied by the caller.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;
use tracing::warn;

use crate::parser::util::{open_input, strip_line_end};
use crate::types::{Match, MatchStrand};

const MATCH_COLUMNS: usize = 9;

fn parse_match_line(line: &str, chromosome: &str) -> Option<Match> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MATCH_COLUMNS {
        return None;
    }

    let start: u64 = fields[0].parse().ok()?;
    let end: u64 = fields[1].parse().ok()?;
    if end < start {
        return None;
    }
    let strand: MatchStrand = fields[2].parse().ok()?;

    Some(Match {
        chromosome: chromosome.to_string(),
        start,
        end,
        strand,
        matched_sequence: fields[3].to_string(),
        marker_id: fields[4].to_string(),
        marker_length: fields[5].parse().ok()?,
        occurrence_count: fields[6].parse().ok()?,
        upstream: fields[7].to_string(),
        downstream: fields[8].to_string(),
    })
}

/// Parse match records from a reader.
///
/// The header line and malformed lines are skipped; only malformed lines are
/// reported.
pub fn parse_matches_reader<R: BufRead>(reader: R, chromosome: &str) -> Result<Vec<Match>> {
    let mut matches = Vec::new();
    let mut skipped = 0usize;

    for (i, line_result) in reader.lines().enumerate() {
        let line = line_result.context("Failed to read match line")?;
        let line = strip_line_end(&line);
        if line.trim().is_empty() {
            continue;
        }

        match parse_match_line(line, chromosome) {
            Some(record) => matches.push(record),
            None if i == 0 => {}
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped malformed match lines");
    }

    Ok(matches)
}

/// Read a (possibly gzipped) match table.
pub fn read_matches(path: &Path, chromosome: &str) -> Result<Vec<Match>> {
    let reader = open_input(path)?;
    parse_matches_reader(reader, chromosome)
        .with_context(|| format!("Failed to parse matches {}", path.display()))
}
