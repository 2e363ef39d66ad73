//! Exact marker search.
//!
//! A naive scan over every window of the reference. No pattern preprocessing
//! or index is built, so the cost is O(N·m) per pattern.

/// Complement of a single nucleotide.
///
/// `A<->T` and `C<->G` keep the input case; any other symbol (`N`, IUPAC
/// codes) is returned unchanged.
fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        other => other,
    }
}

/// Reverse complement of a sequence.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

/// Whether a sequence equals its own reverse complement.
pub fn is_palindromic(seq: &[u8]) -> bool {
    let n = seq.len();
    (0..n).all(|i| seq[i] == complement(seq[n - 1 - i]))
}

/// All start offsets of `pattern` in `reference`, ascending.
///
/// Overlapping occurrences are reported: after a hit at `i` the scan resumes
/// at `i + 1`. An empty pattern or one longer than the reference has no
/// occurrences.
pub fn find_occurrences(reference: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > reference.len() {
        return Vec::new();
    }

    reference
        .windows(pattern.len())
        .enumerate()
        .filter_map(|(i, window)| (window == pattern).then_some(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"AACG"), b"CGTT".to_vec());
        assert_eq!(reverse_complement(b"acgN"), b"Ncgt".to_vec());
        assert_eq!(reverse_complement(b""), Vec::<u8>::new());
    }

    #[test]
    fn test_reverse_complement_is_involution() {
        for seq in [&b"A"[..], b"GATTACA", b"CCCGGGTTTAAA", b"acgtACGT"] {
            assert_eq!(reverse_complement(&reverse_complement(seq)), seq.to_vec());
        }
    }

    #[test]
    fn test_is_palindromic() {
        assert!(is_palindromic(b"ACGT"));
        assert!(is_palindromic(b"GAATTC"));
        assert!(!is_palindromic(b"GGGG"));
        assert!(!is_palindromic(b"ACG"));
    }

    #[test]
    fn test_find_occurrences_overlapping() {
        assert_eq!(find_occurrences(b"AAAA", b"AA"), vec![0, 1, 2]);
        assert_eq!(find_occurrences(b"ACGTACGTTTACGT", b"ACGT"), vec![0, 4, 10]);
    }

    #[test]
    fn test_find_occurrences_degenerate() {
        assert!(find_occurrences(b"ACGT", b"").is_empty());
        assert!(find_occurrences(b"ACG", b"ACGT").is_empty());
        assert!(find_occurrences(b"", b"A").is_empty());
        assert_eq!(find_occurrences(b"ACGT", b"ACGT"), vec![0]);
    }

    #[test]
    fn test_find_occurrences_is_case_sensitive() {
        assert!(find_occurrences(b"acgt", b"ACGT").is_empty());
    }
}
