//! Core data structures for markmatch.
//!
//! This module contains the marker, match and feature types shared by the
//! matching and annotation stages.

use std::fmt;
use std::str::FromStr;

/// Strand orientation for genomic features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Positive,
    Negative,
}

/// Error type for parsing strand from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrandError;

impl fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid strand: expected '+' or '-'")
    }
}

impl std::error::Error for ParseStrandError {}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Positive),
            "-" => Ok(Strand::Negative),
            _ => Err(ParseStrandError),
        }
    }
}

impl Strand {
    /// Convert strand to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orientation of a marker hit: as given, or found via its reverse complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrand {
    Forward,
    Reverse,
}

/// Error type for parsing a match strand from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMatchStrandError;

impl fmt::Display for ParseMatchStrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid match strand: expected 'F' or 'R'")
    }
}

impl std::error::Error for ParseMatchStrandError {}

impl FromStr for MatchStrand {
    type Err = ParseMatchStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(MatchStrand::Forward),
            "R" => Ok(MatchStrand::Reverse),
            _ => Err(ParseMatchStrandError),
        }
    }
}

impl MatchStrand {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrand::Forward => "F",
            MatchStrand::Reverse => "R",
        }
    }

    /// Feature strand a hit is compared against: Forward is '+', Reverse is '-'.
    pub fn feature_strand(&self) -> Strand {
        match self {
            MatchStrand::Forward => Strand::Positive,
            MatchStrand::Reverse => Strand::Negative,
        }
    }
}

impl fmt::Display for MatchStrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A short query sequence to locate in the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub id: String,
    pub sequence: String,
}

impl Marker {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Marker {
            id: id.into(),
            sequence: sequence.into(),
        }
    }
}

/// One named reference sequence (a chromosome or contig).
#[derive(Debug, Clone)]
pub struct Reference {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl Reference {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Reference {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// One occurrence of a marker in the reference.
///
/// Positions are 0-based and inclusive on both ends, so
/// `end - start + 1 == marker_length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: MatchStrand,
    pub matched_sequence: String,
    pub marker_id: String,
    pub marker_length: u64,
    /// Forward plus reverse occurrences of the same marker in the same pass.
    pub occurrence_count: u64,
    pub upstream: String,
    pub downstream: String,
}

impl Match {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// A gene interval from the GFF annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneFeature {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub gene_id: String,
    pub gene_type: String,
    pub synonyms: String,
}

/// A transcription start site of one transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TssRecord {
    pub chromosome: String,
    pub start: u64,
    pub gene_id: String,
    pub transcript_id: String,
    pub gene_type: String,
    pub synonyms: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpgIsland {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub gc_content: f64,
    pub obs_exp_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatElement {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
    pub class: String,
    pub strand: Strand,
}

impl RepeatElement {
    /// Reported repeat length (`end - start`).
    pub fn length(&self) -> u64 {
        self.end - self.start
    }
}

/// Nearest TSS for a match.
#[derive(Debug, Clone, PartialEq)]
pub struct TssHit {
    pub gene_id: String,
    pub distance: u64,
    pub gene_type: String,
    pub synonyms: String,
}

/// Same-strand gene with the largest overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneHit {
    pub gene_id: String,
    pub gene_type: String,
    pub synonyms: String,
    pub overlap: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpgHit {
    pub gc_content: f64,
    pub obs_exp_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatHit {
    pub name: String,
    pub class: String,
    pub length: u64,
}

/// A match together with the results of the four feature lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedMatch {
    pub record: Match,
    pub tss: Option<TssHit>,
    pub gene: Option<GeneHit>,
    pub cpg: Option<CpgHit>,
    pub repeat: Option<RepeatHit>,
}

impl AnnotatedMatch {
    pub fn chromosome(&self) -> &str {
        &self.record.chromosome
    }

    pub fn in_cpg(&self) -> bool {
        self.cpg.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_parsing() {
        assert_eq!("+".parse::<Strand>(), Ok(Strand::Positive));
        assert_eq!("-".parse::<Strand>(), Ok(Strand::Negative));
        assert!(".".parse::<Strand>().is_err());
    }

    #[test]
    fn test_match_strand_parsing() {
        assert_eq!("F".parse::<MatchStrand>(), Ok(MatchStrand::Forward));
        assert_eq!("R".parse::<MatchStrand>(), Ok(MatchStrand::Reverse));
        assert!("+".parse::<MatchStrand>().is_err());
        assert!("f".parse::<MatchStrand>().is_err());
    }

    #[test]
    fn test_match_strand_maps_to_feature_strand() {
        assert_eq!(MatchStrand::Forward.feature_strand(), Strand::Positive);
        assert_eq!(MatchStrand::Reverse.feature_strand(), Strand::Negative);
    }

    #[test]
    fn test_repeat_length_is_end_minus_start() {
        let repeat = RepeatElement {
            chromosome: "chr1".to_string(),
            start: 100,
            end: 250,
            name: "AluY".to_string(),
            class: "SINE".to_string(),
            strand: Strand::Positive,
        };
        assert_eq!(repeat.length(), 150);
    }

    #[test]
    fn test_reference_len() {
        let reference = Reference::new("chr1", "ACGT");
        assert_eq!(reference.len(), 4);
        assert!(!reference.is_empty());
        assert!(Reference::new("chr2", "").is_empty());
    }
}
