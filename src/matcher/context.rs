//! Flanking context around a match.

/// Upstream and downstream flanks of the inclusive span `[start, end]`.
///
/// Each flank holds at most `size` bases and is clipped at the reference
/// boundaries, so it may be shorter or empty. `end` must lie inside the
/// reference.
pub fn extract_context(reference: &[u8], start: usize, end: usize, size: usize) -> (&[u8], &[u8]) {
    let upstream_start = start.saturating_sub(size);
    let upstream = &reference[upstream_start..start];

    let downstream_start = (end + 1).min(reference.len());
    let downstream_end = downstream_start.saturating_add(size).min(reference.len());
    let downstream = &reference[downstream_start..downstream_end];

    (upstream, downstream)
}
