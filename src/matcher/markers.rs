//! Marker matching across a reference.
//!
//! Each marker is searched on both strands independently of all others, so
//! the marker list is split into contiguous chunks and every chunk is
//! processed by its own worker against the shared, read-only reference.

use std::borrow::Cow;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::matcher::context::extract_context;
use crate::matcher::sequence::{find_occurrences, is_palindromic, reverse_complement};
use crate::pool::{run_chunks, split_into_chunks};
use crate::types::{Marker, Match, MatchStrand, Reference};

/// Find every occurrence of one marker and its reverse complement.
///
/// Forward hits come first, then reverse hits, each in ascending position.
/// The reverse complement is not searched for palindromic markers, so their
/// hits are never counted twice. Every returned match carries the total
/// number of hits of this call as its occurrence count.
pub fn match_marker(marker: &Marker, reference: &Reference, context_size: usize) -> Vec<Match> {
    let pattern = marker.sequence.as_bytes();
    let sequence = reference.sequence.as_slice();

    let mut hits: Vec<(usize, MatchStrand)> = find_occurrences(sequence, pattern)
        .into_iter()
        .map(|start| (start, MatchStrand::Forward))
        .collect();

    if !is_palindromic(pattern) {
        let rc = reverse_complement(pattern);
        hits.extend(
            find_occurrences(sequence, &rc)
                .into_iter()
                .map(|start| (start, MatchStrand::Reverse)),
        );
    }

    let occurrence_count = hits.len() as u64;
    let marker_length = pattern.len() as u64;

    hits.into_iter()
        .map(|(start, strand)| {
            let end = start + pattern.len() - 1;
            let (upstream, downstream) = extract_context(sequence, start, end, context_size);

            Match {
                chromosome: reference.name.clone(),
                start: start as u64,
                end: end as u64,
                strand,
                matched_sequence: String::from_utf8_lossy(&sequence[start..=end]).into_owned(),
                marker_id: marker.id.clone(),
                marker_length,
                occurrence_count,
                upstream: String::from_utf8_lossy(upstream).into_owned(),
                downstream: String::from_utf8_lossy(downstream).into_owned(),
            }
        })
        .collect()
}

/// Match all markers against one reference using `config.worker_count()` workers.
///
/// Output is the concatenation of the per-worker outputs in chunk order, so
/// records are grouped by marker in input order rather than by position.
pub fn match_markers(markers: &[Marker], reference: &Reference, config: &Config) -> Result<Vec<Match>> {
    if reference.is_empty() {
        return Err(Error::EmptyReference(reference.name.clone()));
    }
    if markers.is_empty() {
        return Err(Error::NoMarkers);
    }

    let reference = if config.ignore_case {
        Cow::Owned(Reference::new(
            reference.name.clone(),
            reference.sequence.to_ascii_uppercase(),
        ))
    } else {
        Cow::Borrowed(reference)
    };
    let reference = reference.as_ref();

    let workers = config.worker_count();
    let chunks = split_into_chunks(markers, workers);
    debug!(
        reference = %reference.name,
        markers = markers.len(),
        chunks = chunks.len(),
        "matching markers"
    );

    let matches = run_chunks(&chunks, workers, |chunk| {
        let mut out = Vec::new();
        for marker in chunk {
            if config.ignore_case {
                let upper = Marker::new(marker.id.clone(), marker.sequence.to_ascii_uppercase());
                out.extend(match_marker(&upper, reference, config.context_size));
            } else {
                out.extend(match_marker(marker, reference, config.context_size));
            }
        }
        Ok(out)
    })?;

    info!(
        reference = %reference.name,
        matches = matches.len(),
        "marker search finished"
    );
    Ok(matches)
}

/// Match all markers against several references, one search pass per reference.
///
/// Every reference must be non-empty; the first empty one aborts the run.
pub fn match_references(
    markers: &[Marker],
    references: &[Reference],
    config: &Config,
) -> Result<Vec<Match>> {
    if let Some(empty) = references.iter().find(|r| r.is_empty()) {
        return Err(Error::EmptyReference(empty.name.clone()));
    }

    let mut all = Vec::new();
    for reference in references {
        all.extend(match_markers(markers, reference, config)?);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Reference {
        Reference::new("chr1", "ACGTACGTTTACGT")
    }

    #[test]
    fn test_match_marker_palindrome() {
        let matches = match_marker(&Marker::new("m1", "ACGT"), &reference(), 20);
        let starts: Vec<u64> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 4, 10]);
        assert!(matches.iter().all(|m| m.strand == MatchStrand::Forward));
        assert!(matches.iter().all(|m| m.occurrence_count == 3));
        assert!(matches.iter().all(|m| m.end == m.start + 3));
    }

    #[test]
    fn test_match_marker_reverse_strand() {
        // revcomp(AAAC) = GTTT, present at 6..=9
        let matches = match_marker(&Marker::new("m3", "AAAC"), &reference(), 2);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.strand, MatchStrand::Reverse);
        assert_eq!((m.start, m.end), (6, 9));
        assert_eq!(m.matched_sequence, "GTTT");
        assert_eq!(m.upstream, "AC");
        assert_eq!(m.downstream, "AC");
        assert_eq!(m.occurrence_count, 1);
        assert_eq!(m.marker_length, 4);
    }

    #[test]
    fn test_match_marker_counts_both_strands() {
        let reference = Reference::new("chr1", "GGATCCTTTGG");
        // CC forward at 4; revcomp GG at 0 and 9
        let matches = match_marker(&Marker::new("cc", "CC"), &reference, 20);
        let summary: Vec<(u64, MatchStrand)> = matches.iter().map(|m| (m.start, m.strand)).collect();
        assert_eq!(
            summary,
            vec![
                (4, MatchStrand::Forward),
                (0, MatchStrand::Reverse),
                (9, MatchStrand::Reverse)
            ]
        );
        assert!(matches.iter().all(|m| m.occurrence_count == 3));
    }

    #[test]
    fn test_match_markers_rejects_empty_inputs() {
        let config = Config::default();
        let err = match_markers(&[Marker::new("m", "A")], &Reference::new("chrE", ""), &config)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyReference(name) if name == "chrE"));

        let err = match_markers(&[], &reference(), &config).unwrap_err();
        assert!(matches!(err, Error::NoMarkers));
    }

    #[test]
    fn test_match_markers_ignore_case() {
        let mut config = Config::default();
        config.threads = 1;
        let lower = Reference::new("chr1", "ttacgtaa");

        let matches = match_markers(&[Marker::new("m", "ACGT")], &lower, &config).unwrap();
        assert!(matches.is_empty());

        config.ignore_case = true;
        let matches = match_markers(&[Marker::new("m", "acgt")], &lower, &config).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 2);
        assert_eq!(matches[0].upstream, "TT");
    }

    #[test]
    fn test_match_markers_keeps_chunk_order() {
        let mut config = Config::default();
        config.threads = 3;
        let markers = vec![
            Marker::new("a", "TTAC"),
            Marker::new("b", "ACGT"),
            Marker::new("c", "GGGG"),
            Marker::new("d", "TACG"),
        ];
        let matches = match_markers(&markers, &reference(), &config).unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.marker_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "b", "b", "d", "d", "d"]);
    }

    #[test]
    fn test_match_references_per_record_counts() {
        let mut config = Config::default();
        config.threads = 2;
        let references = vec![
            Reference::new("chrA", "ACGTACGT"),
            Reference::new("chrB", "TTACGTT"),
        ];
        let matches = match_references(&[Marker::new("m1", "ACGT")], &references, &config).unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].chromosome, "chrA");
        assert_eq!(matches[0].occurrence_count, 2);
        assert_eq!(matches[2].chromosome, "chrB");
        assert_eq!(matches[2].occurrence_count, 1);
    }
}
