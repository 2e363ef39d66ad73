//! Output formatting for markmatch results.
//!
//! Both stages write tab-separated tables with a header line. Lookups that
//! found nothing are rendered with fixed placeholders.

use anyhow::Result;

use std::io::Write;

use crate::types::{AnnotatedMatch, Match};

/// Column names of the match-stage table.
pub const MATCH_HEADER: &str = "Start\tEnd\tStrand\tMatchedSequence\tMarkerID\tLength\tOccurrenceCount\tUpstreamContext\tDownstreamContext";

/// Column names of the annotation-stage table.
pub const ANNOTATION_HEADER: &str = "Start\tEnd\tStrand\tMatchedSeq\tOccurrences\tChromosome\tTSS_Gene\tTSS_Distance\tTSS_Gene_Type\tTSS_Gene_Synonyms\tGFF_Gene\tGFF_Gene_Type\tGFF_Gene_Synonyms\tInCpG\tCpG_GC_Content\tCpG_ObsExp\tRepeat_Name\tRepeat_Class\tRepeat_Length";

/// Format one match-stage line.
pub fn format_match_line(record: &Match) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.start,
        record.end,
        record.strand,
        record.matched_sequence,
        record.marker_id,
        record.marker_length,
        record.occurrence_count,
        record.upstream,
        record.downstream
    )
}

/// Format one annotation-stage line.
pub fn format_annotated_line(annotated: &AnnotatedMatch) -> String {
    let record = &annotated.record;

    let tss = match &annotated.tss {
        Some(hit) => format!(
            "{}\t{}\t{}\t{}",
            hit.gene_id, hit.distance, hit.gene_type, hit.synonyms
        ),
        None => "None\tN/A\tN/A\tN/A".to_string(),
    };

    let gene = match &annotated.gene {
        Some(hit) => format!("{}\t{}\t{}", hit.gene_id, hit.gene_type, hit.synonyms),
        None => "None\tN/A\tN/A".to_string(),
    };

    let cpg = match &annotated.cpg {
        Some(hit) => format!("true\t{}\t{}", hit.gc_content, hit.obs_exp_ratio),
        None => "false\t0\t0".to_string(),
    };

    let repeat = match &annotated.repeat {
        Some(hit) => format!("{}\t{}\t{}", hit.name, hit.class, hit.length),
        None => "No\tNone\t0".to_string(),
    };

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.start,
        record.end,
        record.strand,
        record.matched_sequence,
        record.occurrence_count,
        record.chromosome,
        tss,
        gene,
        cpg,
        repeat
    )
}

/// Write the match table, header first.
pub fn write_matches<W: Write>(writer: &mut W, matches: &[Match]) -> Result<()> {
    writeln!(writer, "{}", MATCH_HEADER)?;
    for record in matches {
        writeln!(writer, "{}", format_match_line(record))?;
    }
    Ok(())
}

/// Write the annotation table, header first.
pub fn write_annotated<W: Write>(writer: &mut W, annotated: &[AnnotatedMatch]) -> Result<()> {
    writeln!(writer, "{}", ANNOTATION_HEADER)?;
    for record in annotated {
        writeln!(writer, "{}", format_annotated_line(record))?;
    }
    Ok(())
}
