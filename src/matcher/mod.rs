//! Locating markers in a reference sequence.

pub mod context;
pub mod markers;
pub mod sequence;

pub use context::extract_context;
pub use markers::{match_marker, match_markers, match_references};
pub use sequence::{find_occurrences, is_palindromic, reverse_complement};
