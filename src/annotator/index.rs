//! Per-chromosome feature collections.
//!
//! Every feature type is stored as one vector per chromosome, sorted by start
//! position. Features sharing a start are all kept. The longest feature span
//! of each chromosome is recorded so overlap queries can binary-search a safe
//! starting point instead of scanning from the beginning.

use ahash::AHashMap;
use std::cmp::Ordering;

use crate::types::{CpgIsland, GeneFeature, RepeatElement, TssRecord};

/// A feature located on one chromosome between two inclusive positions.
pub trait Interval {
    fn chromosome(&self) -> &str;
    fn start(&self) -> u64;
    fn end(&self) -> u64;
}

impl Interval for GeneFeature {
    fn chromosome(&self) -> &str {
        &self.chromosome
    }
    fn start(&self) -> u64 {
        self.start
    }
    fn end(&self) -> u64 {
        self.end
    }
}

impl Interval for TssRecord {
    fn chromosome(&self) -> &str {
        &self.chromosome
    }
    fn start(&self) -> u64 {
        self.start
    }
    fn end(&self) -> u64 {
        self.start
    }
}

impl Interval for CpgIsland {
    fn chromosome(&self) -> &str {
        &self.chromosome
    }
    fn start(&self) -> u64 {
        self.start
    }
    fn end(&self) -> u64 {
        self.end
    }
}

impl Interval for RepeatElement {
    fn chromosome(&self) -> &str {
        &self.chromosome
    }
    fn start(&self) -> u64 {
        self.start
    }
    fn end(&self) -> u64 {
        self.end
    }
}

/// Features of one type grouped by chromosome and sorted by start.
#[derive(Debug, Clone)]
pub struct ChromIndex<T> {
    by_chrom: AHashMap<String, Vec<T>>,
    max_spans: AHashMap<String, u64>,
}

impl<T> Default for ChromIndex<T> {
    fn default() -> Self {
        ChromIndex {
            by_chrom: AHashMap::new(),
            max_spans: AHashMap::new(),
        }
    }
}

impl<T: Interval> ChromIndex<T> {
    /// Build an index, sorting each chromosome with `order`.
    ///
    /// `order` must order by start first; the sort is stable, so features it
    /// considers equal keep their load order.
    pub fn build<I, F>(features: I, order: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T, &T) -> Ordering,
    {
        let mut by_chrom: AHashMap<String, Vec<T>> = AHashMap::new();
        for feature in features {
            by_chrom
                .entry(feature.chromosome().to_string())
                .or_default()
                .push(feature);
        }

        let mut max_spans = AHashMap::new();
        for (chrom, features) in by_chrom.iter_mut() {
            features.sort_by(&order);
            let max_span = features
                .iter()
                .map(|f| f.end().saturating_sub(f.start()))
                .max()
                .unwrap_or(0);
            max_spans.insert(chrom.clone(), max_span);
        }

        ChromIndex {
            by_chrom,
            max_spans,
        }
    }

    /// All features of a chromosome in sorted order (empty if unknown).
    pub fn get(&self, chrom: &str) -> &[T] {
        self.by_chrom.get(chrom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Features that may intersect `[start, end]`, in start order.
    ///
    /// Iteration begins at the first feature that could still reach `start`
    /// given the chromosome's longest span and stops at the first feature
    /// starting after `end`. Callers still test each candidate for overlap.
    pub fn candidates(&self, chrom: &str, start: u64, end: u64) -> impl Iterator<Item = &T> {
        let features = self.get(chrom);
        let max_span = self.max_spans.get(chrom).copied().unwrap_or(0);
        let search_start = start.saturating_sub(max_span);
        let first = features.partition_point(|f| f.start() < search_start);

        features[first..]
            .iter()
            .take_while(move |f| f.start() <= end)
    }

    pub fn len(&self) -> usize {
        self.by_chrom.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.by_chrom.keys().map(String::as_str)
    }
}

/// The four feature collections consulted for every match.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    pub genes: ChromIndex<GeneFeature>,
    pub tss: ChromIndex<TssRecord>,
    pub cpg: ChromIndex<CpgIsland>,
    pub repeats: ChromIndex<RepeatElement>,
}
