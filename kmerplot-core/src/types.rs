use std::fmt;

use crate::error::{KmerPlotError, Result};

/// Position within a sample sequence (0-based)
pub type Position = u64;

/// Mapping quality as carried by SAM/BAM (255 = unavailable)
pub type MappingQuality = u8;

/// MAPQ reported when the aligner left the field unset
pub const MAPQ_UNAVAILABLE: MappingQuality = 255;

/// Separator between a sample name and its window markers, and between a
/// gene name and the rest of a reference name
pub const FIELD_SEPARATOR: char = '_';

/// Parsed `<sample>_<start>_to_<end>` window identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowId {
    pub sample: String,
    pub start: Position,
    pub end: Position,
}

impl WindowId {
    pub fn new(sample: impl Into<String>, start: Position, end: Position) -> Self {
        Self { sample: sample.into(), start, end }
    }

    /// Parse a window identifier. The sample name is everything before the
    /// last three `_`-separated fields, so it may contain underscores itself.
    pub fn parse(id: &str) -> Result<Self> {
        let mut fields = id.rsplitn(4, FIELD_SEPARATOR);
        let (end, to, start, sample) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(end), Some(to), Some(start), Some(sample)) => (end, to, start, sample),
            _ => return Err(KmerPlotError::malformed_identifier(id, "expected <sample>_<start>_to_<end>")),
        };

        if to != "to" {
            return Err(KmerPlotError::malformed_identifier(id, format!("expected 'to' marker, found '{}'", to)));
        }
        if sample.is_empty() {
            return Err(KmerPlotError::malformed_identifier(id, "empty sample name"));
        }

        let start: Position = start
            .parse()
            .map_err(|_| KmerPlotError::malformed_identifier(id, format!("invalid window start '{}'", start)))?;
        let end: Position = end
            .parse()
            .map_err(|_| KmerPlotError::malformed_identifier(id, format!("invalid window end '{}'", end)))?;

        if end < start {
            return Err(KmerPlotError::malformed_identifier(id, "window end precedes window start"));
        }

        Ok(Self::new(sample, start, end))
    }

    /// Number of bases covered, both ends inclusive
    pub fn span(&self) -> Position {
        self.end - self.start + 1
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_to_{}", self.sample, self.start, self.end)
    }
}

/// Gene name of a reference sequence: the part before its first `_`
pub fn gene_name(reference: &str) -> &str {
    reference.split(FIELD_SEPARATOR).next().unwrap_or(reference)
}

/// One alignment result for a k-mer window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub sample: String,
    pub window_start: Position,
    pub window_end: Position,
    /// Aligned-to reference name; `None` for unmapped records
    pub reference: Option<String>,
    pub is_mapped: bool,
    pub mapping_quality: MappingQuality,
}

impl AlignmentRecord {
    pub fn new(
        window: WindowId,
        reference: Option<String>,
        is_mapped: bool,
        mapping_quality: MappingQuality,
    ) -> Self {
        Self {
            sample: window.sample,
            window_start: window.start,
            window_end: window.end,
            reference,
            is_mapped,
            mapping_quality,
        }
    }

    /// Build a record straight from a query name as written by the window encoder
    pub fn from_query_name(
        query_name: &str,
        reference: Option<String>,
        is_mapped: bool,
        mapping_quality: MappingQuality,
    ) -> Result<Self> {
        Ok(Self::new(WindowId::parse(query_name)?, reference, is_mapped, mapping_quality))
    }

    /// Convenience constructor for a mapped record
    pub fn mapped(query_name: &str, reference: &str, mapping_quality: MappingQuality) -> Result<Self> {
        Self::from_query_name(query_name, Some(reference.to_string()), true, mapping_quality)
    }

    /// Convenience constructor for an unmapped record
    pub fn unmapped(query_name: &str) -> Result<Self> {
        Self::from_query_name(query_name, None, false, 0)
    }

    /// K-mer size implied by this record's window markers
    pub fn kmer_size(&self) -> Position {
        self.window_end - self.window_start + 1
    }

    /// Gene the record maps to, if it is mapped to a named reference
    pub fn gene(&self) -> Option<&str> {
        if !self.is_mapped {
            return None;
        }
        self.reference.as_deref().map(gene_name)
    }
}

/// Classification outcome for one (sample, window) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Single best-mapping gene
    Gene(String),
    /// Top alignment ties across every gene of interest
    Both,
    /// Window observed but nothing aligned
    NoAlignment,
    /// Window lies beyond the end of the sample's sequence
    PastEnd,
}

impl Category {
    pub const BOTH_KEY: &'static str = "Both";
    pub const NO_ALIGNMENT_KEY: &'static str = "None";
    pub const PAST_END_KEY: &'static str = "Past_end";

    /// Key used in the color table
    pub fn key(&self) -> &str {
        match self {
            Category::Gene(gene) => gene,
            Category::Both => Self::BOTH_KEY,
            Category::NoAlignment => Self::NO_ALIGNMENT_KEY,
            Category::PastEnd => Self::PAST_END_KEY,
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            Self::BOTH_KEY => Category::Both,
            Self::NO_ALIGNMENT_KEY => Category::NoAlignment,
            Self::PAST_END_KEY => Category::PastEnd,
            gene => Category::Gene(gene.to_string()),
        }
    }

    /// Keys every color table must carry regardless of the genes configured
    pub fn reserved_keys() -> [&'static str; 3] {
        [Self::BOTH_KEY, Self::NO_ALIGNMENT_KEY, Self::PAST_END_KEY]
    }

    /// Whether this category counts towards a sample's relevance
    pub fn is_relevant(&self, genes_of_interest: &[String]) -> bool {
        match self {
            Category::Both => true,
            Category::Gene(gene) => genes_of_interest.iter().any(|g| g == gene),
            Category::NoAlignment | Category::PastEnd => false,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
