//! Annotation of matches against the feature collections.

use tracing::{debug, info};

use crate::annotator::index::FeatureIndex;
use crate::annotator::lookup::{nearest_tss, overlapping_cpg, overlapping_gene, overlapping_repeat};
use crate::config::Config;
use crate::error::Result;
use crate::pool::{run_chunks, split_into_chunks};
use crate::types::{AnnotatedMatch, Match};

/// Run the four independent lookups for one match.
///
/// The nearest TSS is measured from the match start. Gene and repeat
/// lookups compare against the feature strand the match strand maps to.
pub fn annotate_match(record: &Match, features: &FeatureIndex) -> AnnotatedMatch {
    let chrom = record.chromosome.as_str();
    let strand = record.strand.feature_strand();

    AnnotatedMatch {
        tss: nearest_tss(&features.tss, chrom, record.start),
        gene: overlapping_gene(&features.genes, chrom, record.start, record.end, strand),
        cpg: overlapping_cpg(&features.cpg, chrom, record.start, record.end),
        repeat: overlapping_repeat(&features.repeats, chrom, record.start, record.end, strand),
        record: record.clone(),
    }
}

/// Annotate all matches using `config.worker_count()` workers.
///
/// Matches are split into contiguous chunks and results are merged in chunk
/// order, so the output follows the input order.
pub fn annotate_matches(
    matches: &[Match],
    features: &FeatureIndex,
    config: &Config,
) -> Result<Vec<AnnotatedMatch>> {
    let workers = config.worker_count();
    let chunks = split_into_chunks(matches, workers);
    debug!(matches = matches.len(), chunks = chunks.len(), "annotating matches");

    let annotated = run_chunks(&chunks, workers, |chunk| {
        Ok(chunk.iter().map(|m| annotate_match(m, features)).collect())
    })?;

    info!(
        annotated = annotated.len(),
        in_cpg = annotated.iter().filter(|a| a.in_cpg()).count(),
        "annotation finished"
    );
    Ok(annotated)
}
