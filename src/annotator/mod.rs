//! Annotating matches with nearby and overlapping genomic features.

pub mod annotate;
pub mod index;
pub mod loaders;
pub mod lookup;

pub use annotate::{annotate_match, annotate_matches};
pub use index::{ChromIndex, FeatureIndex, Interval};
pub use loaders::{load_cpg, load_genes, load_repeats, load_tss};
pub use lookup::{nearest_tss, overlap_length, overlapping_cpg, overlapping_gene, overlapping_repeat};
