//! Configuration and defaults for markmatch.
//!
//! This module contains the configuration structure and default values
//! that control marker matching and feature annotation.

/// Default flank length reported on each side of a match.
pub const DEFAULT_CONTEXT_SIZE: usize = 20;

/// Chromosome assumed for matches that do not carry one.
pub const DEFAULT_CHROMOSOME: &str = "chr1";

/// GFF feature types accepted by the gene loader.
pub const DEFAULT_GENE_TYPES: [&str; 2] = ["gene", "ncRNA_gene"];

/// Configuration for the matching and annotation stages.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum upstream/downstream context length in bp.
    pub context_size: usize,
    /// Chromosome used for matches read without chromosome information.
    pub chromosome: String,
    /// Number of workers (0 = one per available core).
    pub threads: usize,
    /// Uppercase reference and markers before searching.
    pub ignore_case: bool,
    /// GFF feature types loaded as genes.
    pub gene_feature_types: Vec<String>,
    /// Whether the TSS table starts with a header row.
    pub tss_has_header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            context_size: DEFAULT_CONTEXT_SIZE,
            chromosome: DEFAULT_CHROMOSOME.to_string(),
            threads: 0,
            ignore_case: false,
            gene_feature_types: DEFAULT_GENE_TYPES.iter().map(|s| s.to_string()).collect(),
            tss_has_header: true,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted gene feature types from a comma-separated string.
    ///
    /// Returns false (and keeps the current list) if no type was given.
    pub fn parse_gene_types(&mut self, types_str: &str) -> bool {
        let mut new_types: Vec<String> = Vec::new();

        for tag in types_str.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !new_types.iter().any(|t| t == tag) {
                new_types.push(tag.to_string());
            }
        }

        if new_types.is_empty() {
            false
        } else {
            self.gene_feature_types = new_types;
            true
        }
    }

    /// Whether a GFF feature type is loaded as a gene.
    pub fn is_gene_type(&self, feature_type: &str) -> bool {
        self.gene_feature_types.iter().any(|t| t == feature_type)
    }

    /// Resolve the worker count, falling back to the number of cores.
    pub fn worker_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.threads
        }
    }
}
