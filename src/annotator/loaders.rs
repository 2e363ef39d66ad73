//! Builders for the four feature collections.
//!
//! Loaders take rows that were already split into fields. They are
//! permissive: a row with too few columns, an unparsable coordinate or an
//! invalid strand is skipped and counted, never fatal.

use std::str::FromStr;
use tracing::{debug, warn};

use crate::annotator::index::ChromIndex;
use crate::config::Config;
use crate::types::{CpgIsland, GeneFeature, RepeatElement, Strand, TssRecord};

/// Placeholder for a missing annotation value.
pub const MISSING: &str = "N/A";

const GENE_COLUMNS: usize = 9;
const TSS_COLUMNS: usize = 7;
const CPG_COLUMNS: usize = 11;
const REPEAT_COLUMNS: usize = 6;

/// Extract a `key=value` attribute from a GFF3 attribute column.
fn extract_attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

fn field<S: AsRef<str>>(fields: &[S], idx: usize) -> &str {
    fields[idx].as_ref().trim()
}

fn parse_field<S: AsRef<str>, T: FromStr>(fields: &[S], idx: usize) -> Option<T> {
    field(fields, idx).parse().ok()
}

fn or_missing(value: &str) -> String {
    if value.is_empty() {
        MISSING.to_string()
    } else {
        value.to_string()
    }
}

fn report_skipped(kind: &str, loaded: usize, skipped: usize) {
    if skipped > 0 {
        warn!(kind, skipped, "skipped malformed feature rows");
    }
    debug!(kind, loaded, "feature rows loaded");
}

fn parse_gene_row<S: AsRef<str>>(fields: &[S]) -> Option<GeneFeature> {
    let start: u64 = parse_field(fields, 3)?;
    let end: u64 = parse_field(fields, 4)?;
    if end < start {
        return None;
    }
    let strand: Strand = parse_field(fields, 6)?;
    let attributes = field(fields, 8);

    let gene_id = extract_attribute(attributes, "ID")
        .map(|id| id.strip_prefix("gene:").unwrap_or(id))
        .unwrap_or("");

    Some(GeneFeature {
        chromosome: field(fields, 0).to_string(),
        start,
        end,
        strand,
        gene_id: or_missing(gene_id),
        gene_type: or_missing(extract_attribute(attributes, "biotype").unwrap_or("")),
        synonyms: or_missing(extract_attribute(attributes, "Name").unwrap_or("")),
    })
}

/// Build the gene collection from 9-column GFF3 rows.
///
/// Only rows whose type is listed in `config.gene_feature_types` are kept.
/// Genes sharing a start are all retained, ordered by gene id.
pub fn load_genes<I, R, S>(rows: I, config: &Config) -> ChromIndex<GeneFeature>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut genes = Vec::new();
    let mut skipped = 0;

    for row in rows {
        let fields = row.as_ref();
        if fields.len() < GENE_COLUMNS {
            skipped += 1;
            continue;
        }
        if !config.is_gene_type(field(fields, 2)) {
            continue;
        }
        match parse_gene_row(fields) {
            Some(gene) => genes.push(gene),
            None => skipped += 1,
        }
    }

    report_skipped("gene", genes.len(), skipped);
    ChromIndex::build(genes, |a, b| {
        a.start.cmp(&b.start).then_with(|| a.gene_id.cmp(&b.gene_id))
    })
}

fn parse_tss_row<S: AsRef<str>>(fields: &[S]) -> Option<TssRecord> {
    Some(TssRecord {
        chromosome: field(fields, 2).to_string(),
        start: parse_field(fields, 3)?,
        gene_id: or_missing(field(fields, 0)),
        transcript_id: or_missing(field(fields, 1)),
        gene_type: or_missing(field(fields, 5)),
        synonyms: or_missing(field(fields, 6)),
    })
}

/// Build the TSS collection from 7-column rows.
///
/// Columns: gene id, transcript id, chromosome, TSS position, strand, gene
/// type, gene synonyms. The first row is a header when
/// `config.tss_has_header` is set.
pub fn load_tss<I, R, S>(rows: I, config: &Config) -> ChromIndex<TssRecord>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let skip_header = usize::from(config.tss_has_header);
    let mut sites = Vec::new();
    let mut skipped = 0;

    for row in rows.into_iter().skip(skip_header) {
        let fields = row.as_ref();
        let parsed = if fields.len() < TSS_COLUMNS {
            None
        } else {
            parse_tss_row(fields)
        };
        match parsed {
            Some(site) => sites.push(site),
            None => skipped += 1,
        }
    }

    report_skipped("tss", sites.len(), skipped);
    ChromIndex::build(sites, |a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.transcript_id.cmp(&b.transcript_id))
    })
}

fn parse_cpg_row<S: AsRef<str>>(fields: &[S]) -> Option<CpgIsland> {
    let start: u64 = parse_field(fields, 2)?;
    let end: u64 = parse_field(fields, 3)?;
    if end < start {
        return None;
    }

    Some(CpgIsland {
        chromosome: field(fields, 1).to_string(),
        start,
        end,
        gc_content: parse_field(fields, 9)?,
        obs_exp_ratio: parse_field(fields, 10)?,
    })
}

/// Build the CpG island collection from 11-column UCSC `cpgIslandExt` rows.
pub fn load_cpg<I, R, S>(rows: I) -> ChromIndex<CpgIsland>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut islands = Vec::new();
    let mut skipped = 0;

    for row in rows {
        let fields = row.as_ref();
        let parsed = if fields.len() < CPG_COLUMNS {
            None
        } else {
            parse_cpg_row(fields)
        };
        match parsed {
            Some(island) => islands.push(island),
            None => skipped += 1,
        }
    }

    report_skipped("cpg", islands.len(), skipped);
    ChromIndex::build(islands, |a, b| a.start.cmp(&b.start))
}

fn parse_repeat_row<S: AsRef<str>>(fields: &[S]) -> Option<RepeatElement> {
    let start: u64 = parse_field(fields, 1)?;
    let end: u64 = parse_field(fields, 2)?;
    if end < start {
        return None;
    }

    Some(RepeatElement {
        chromosome: field(fields, 0).to_string(),
        start,
        end,
        name: field(fields, 3).to_string(),
        class: field(fields, 4).to_string(),
        strand: parse_field(fields, 5)?,
    })
}

/// Build the repeat collection from 6-column rows
/// (chromosome, start, end, name, class, strand).
pub fn load_repeats<I, R, S>(rows: I) -> ChromIndex<RepeatElement>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut repeats = Vec::new();
    let mut skipped = 0;

    for row in rows {
        let fields = row.as_ref();
        let parsed = if fields.len() < REPEAT_COLUMNS {
            None
        } else {
            parse_repeat_row(fields)
        };
        match parsed {
            Some(repeat) => repeats.push(repeat),
            None => skipped += 1,
        }
    }

    report_skipped("repeat", repeats.len(), skipped);
    ChromIndex::build(repeats, |a, b| a.start.cmp(&b.start))
}
