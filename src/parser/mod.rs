//! Readers that turn input files into the in-memory data the core consumes.

pub mod fasta;
pub mod matches;
pub mod table;
pub mod util;

pub use fasta::{read_markers, read_references};
pub use matches::read_matches;
pub use table::read_rows;
