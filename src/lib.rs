//! markmatch - Marker location and genomic feature annotation library.
//!
//! This library finds every exact occurrence of short marker sequences (and
//! their reverse complements) in a reference, then annotates each occurrence
//! with the nearest TSS, the overlapping gene, CpG island and repeat element.
//!
//! # Features
//!
//! - Naive exact search with overlapping hits on both strands
//! - Bounded upstream/downstream context for every hit
//! - Per-chromosome sorted feature collections with overlap and proximity lookups
//! - Chunked parallel work with deterministic, ordered merging
//! - FASTA and tab-separated readers (with gzip support)
//!
//! # Example
//!
//! ```ignore
//! use markmatch::annotator::{annotate_matches, load_cpg, load_genes, load_repeats, load_tss, FeatureIndex};
//! use markmatch::config::Config;
//! use markmatch::matcher::match_markers;
//! use markmatch::parser::{read_markers, read_references, read_rows};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let markers = read_markers(Path::new("markers.fa"))?;
//! let references = read_references(Path::new("genome.fa"))?;
//! let matches = match_markers(&markers, &references[0], &config)?;
//!
//! let features = FeatureIndex {
//!     genes: load_genes(read_rows(Path::new("genes.gff3"))?, &config),
//!     tss: load_tss(read_rows(Path::new("tss.tsv"))?, &config),
//!     cpg: load_cpg(read_rows(Path::new("cpgIslandExt.txt"))?),
//!     repeats: load_repeats(read_rows(Path::new("repeats.tsv"))?),
//! };
//! let annotated = annotate_matches(&matches, &features, &config)?;
//! ```

pub mod annotator;
pub mod config;
pub mod error;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod pool;
pub mod types;

pub use config::Config;
pub use error::Error;
pub use types::{AnnotatedMatch, Marker, Match, MatchStrand, Reference, Strand};
