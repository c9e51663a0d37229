//! kmerplot core library
//!
//! Windowing, SAM/BAM input, alignment aggregation, per-window
//! classification and sample ordering for k-mer best-gene plots.

pub mod error;
pub mod types;
pub mod window;
pub mod io;
pub mod aggregate;
pub mod classify;
pub mod compose;
pub mod options;

// Re-export commonly used types and functions
pub use error::{KmerPlotError, Result};
pub use types::{AlignmentRecord, Category, MappingQuality, Position, WindowId, MAPQ_UNAVAILABLE};
pub use window::{EncodeStats, WindowEncoder, DEFAULT_KMER_SIZE, DEFAULT_MIN_KMER_SIZE};
#[cfg(feature = "io-sam")]
pub use io::{read_alignment_file, SamParser};
pub use aggregate::{AlignmentAggregator, AlignmentIndex};
pub use classify::{classify, Classification, Diagnostic, WindowClassifier};
pub use compose::{compose, Cell, Composition, SampleLine};
pub use options::{ColorTable, PlotDefaults, PlotOptions, SortPolicy, DEFAULT_KMER_SHAPE};

/// Version information for the kmerplot core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
