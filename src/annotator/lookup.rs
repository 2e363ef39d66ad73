//! Proximity and overlap lookups against the feature collections.

use crate::annotator::index::ChromIndex;
use crate::types::{
    CpgHit, CpgIsland, GeneFeature, GeneHit, RepeatElement, RepeatHit, Strand, TssHit, TssRecord,
};

/// Number of bases shared by two closed intervals, or `None` if they do not
/// intersect.
pub fn overlap_length(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> Option<u64> {
    if a_end >= b_start && a_start <= b_end {
        Some(a_end.min(b_end) - a_start.max(b_start) + 1)
    } else {
        None
    }
}

/// Find the TSS closest to `position` on `chrom`.
///
/// Sites are sorted by start, then transcript id. The nearest site upstream
/// and the nearest site at or after `position` are compared; on equal
/// distance the upstream site wins, and among sites sharing a start the
/// lowest transcript id wins.
pub fn nearest_tss(index: &ChromIndex<TssRecord>, chrom: &str, position: u64) -> Option<TssHit> {
    let sites = index.get(chrom);
    let idx = sites.partition_point(|t| t.start < position);

    let after = sites.get(idx);
    let before = idx.checked_sub(1).map(|prev| {
        let prev_start = sites[prev].start;
        &sites[sites.partition_point(|t| t.start < prev_start)]
    });

    let best = match (before, after) {
        (Some(b), Some(a)) => {
            if position - b.start <= a.start - position {
                b
            } else {
                a
            }
        }
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };

    Some(TssHit {
        gene_id: best.gene_id.clone(),
        distance: best.start.abs_diff(position),
        gene_type: best.gene_type.clone(),
        synonyms: best.synonyms.clone(),
    })
}

/// Find the gene on `strand` with the largest overlap with `[start, end]`.
///
/// Genes on the other strand are never returned. On equal overlap the first
/// gene in sorted order (lowest start, then gene id) is kept.
pub fn overlapping_gene(
    index: &ChromIndex<GeneFeature>,
    chrom: &str,
    start: u64,
    end: u64,
    strand: Strand,
) -> Option<GeneHit> {
    let mut best: Option<(&GeneFeature, u64)> = None;

    for gene in index.candidates(chrom, start, end) {
        if gene.strand != strand {
            continue;
        }
        if let Some(overlap) = overlap_length(start, end, gene.start, gene.end) {
            if best.map_or(true, |(_, current)| overlap > current) {
                best = Some((gene, overlap));
            }
        }
    }

    best.map(|(gene, overlap)| GeneHit {
        gene_id: gene.gene_id.clone(),
        gene_type: gene.gene_type.clone(),
        synonyms: gene.synonyms.clone(),
        overlap,
    })
}

/// First CpG island, in start order, intersecting `[start, end]`.
pub fn overlapping_cpg(
    index: &ChromIndex<CpgIsland>,
    chrom: &str,
    start: u64,
    end: u64,
) -> Option<CpgHit> {
    index
        .candidates(chrom, start, end)
        .find(|island| overlap_length(start, end, island.start, island.end).is_some())
        .map(|island| CpgHit {
            gc_content: island.gc_content,
            obs_exp_ratio: island.obs_exp_ratio,
        })
}

/// First repeat on `strand`, in start order, intersecting `[start, end]`.
pub fn overlapping_repeat(
    index: &ChromIndex<RepeatElement>,
    chrom: &str,
    start: u64,
    end: u64,
    strand: Strand,
) -> Option<RepeatHit> {
    index
        .candidates(chrom, start, end)
        .filter(|repeat| repeat.strand == strand)
        .find(|repeat| overlap_length(start, end, repeat.start, repeat.end).is_some())
        .map(|repeat| RepeatHit {
            name: repeat.name.clone(),
            class: repeat.class.clone(),
            length: repeat.length(),
        })
}
