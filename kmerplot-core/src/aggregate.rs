//! Alignment aggregation
//!
//! Groups the per-k-mer alignment stream by sample and window start, keeping
//! the distinct (gene, mapping quality) pairs seen for mapped records.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::types::{AlignmentRecord, MappingQuality, Position};

/// Distinct (gene, quality) pairs observed for one window
pub type WindowHits = BTreeSet<(String, MappingQuality)>;

/// Per-sample window table: window start -> hits
pub type SampleWindows = BTreeMap<Position, WindowHits>;

/// Index of aggregated alignments, built once per run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentIndex {
    samples: BTreeMap<String, SampleWindows>,
    kmer_size: Option<Position>,
    max_window_start: Position,
    record_count: usize,
}

impl AlignmentIndex {
    /// Aggregate an in-memory record stream
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AlignmentRecord>,
    {
        let mut aggregator = AlignmentAggregator::new();
        for record in records {
            aggregator.add(&record);
        }
        aggregator.finish()
    }

    /// Aggregate a fallible record stream, stopping at the first error
    pub fn try_from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<AlignmentRecord>>,
    {
        let mut aggregator = AlignmentAggregator::new();
        for record in records {
            aggregator.add(&record?);
        }
        Ok(aggregator.finish())
    }

    /// Hits for a window, or `None` if the window was never observed for the sample
    pub fn window(&self, sample: &str, window_start: Position) -> Option<&WindowHits> {
        self.samples.get(sample)?.get(&window_start)
    }

    /// Sample names in ascending order
    pub fn samples(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// K-mer size established by the first record, if any record was seen
    pub fn kmer_size(&self) -> Option<Position> {
        self.kmer_size
    }

    pub fn max_window_start(&self) -> Position {
        self.max_window_start
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Window starts to display: `[0, max_window_start)` stepped by the k-mer size
    pub fn window_range(&self) -> Vec<Position> {
        match self.kmer_size {
            Some(step) if step > 0 => (0..self.max_window_start).step_by(step as usize).collect(),
            _ => Vec::new(),
        }
    }
}

/// Incremental builder for [`AlignmentIndex`]
#[derive(Debug, Default)]
pub struct AlignmentAggregator {
    index: AlignmentIndex,
    inconsistent_sizes: usize,
}

impl AlignmentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &AlignmentRecord) {
        let index = &mut self.index;
        index.record_count += 1;

        match index.kmer_size {
            None => index.kmer_size = Some(record.kmer_size()),
            Some(size) if record.kmer_size() > size => {
                self.inconsistent_sizes += 1;
            }
            Some(_) => {}
        }
        index.max_window_start = index.max_window_start.max(record.window_start);

        let hits = index
            .samples
            .entry(record.sample.clone())
            .or_default()
            .entry(record.window_start)
            .or_default();

        if let Some(gene) = record.gene() {
            hits.insert((gene.to_string(), record.mapping_quality));
        }
    }

    pub fn finish(self) -> AlignmentIndex {
        if self.inconsistent_sizes > 0 {
            log::warn!(
                "{} windows are wider than the k-mer size {:?} taken from the first record",
                self.inconsistent_sizes,
                self.index.kmer_size
            );
        }
        log::debug!(
            "Aggregated {} records into {} samples (k-mer size {:?}, last window start {})",
            self.index.record_count,
            self.index.samples.len(),
            self.index.kmer_size,
            self.index.max_window_start
        );
        self.index
    }
}
