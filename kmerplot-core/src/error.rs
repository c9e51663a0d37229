//! Error types for kmerplot core operations

use thiserror::Error;

/// Errors raised while reading inputs, validating configuration or
/// classifying windows. All of them abort the run.
#[derive(Debug, Error)]
pub enum KmerPlotError {
    #[error("Malformed window identifier '{id}': {reason}")]
    MalformedIdentifier { id: String, reason: String },

    #[error("Invalid alignment record: {message}")]
    InvalidRecord { message: String },

    #[error("No sequences found in {input}")]
    EmptyInput { input: String },

    #[error("Sequence parse error: {0}")]
    SequenceParse(String),

    #[error("No color configured for category '{key}'")]
    MissingColor { key: String },

    #[error("Unknown sort policy '{0}' (expected 'by_relevance' or 'by_name')")]
    UnknownSortPolicy(String),

    #[error("K-mer size {kmer_size} is below the minimum of {min_kmer_size}")]
    KmerSizeTooSmall { kmer_size: usize, min_kmer_size: usize },

    #[error("Invalid plot options: {0}")]
    InvalidOptions(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KmerPlotError {
    pub fn malformed_identifier<S: Into<String>, R: Into<String>>(id: S, reason: R) -> Self {
        Self::MalformedIdentifier { id: id.into(), reason: reason.into() }
    }

    pub fn invalid_record<S: Into<String>>(message: S) -> Self {
        Self::InvalidRecord { message: message.into() }
    }

    pub fn missing_color<S: Into<String>>(key: S) -> Self {
        Self::MissingColor { key: key.into() }
    }

    /// True for problems with the caller's configuration rather than the data
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColor { .. }
                | Self::UnknownSortPolicy(_)
                | Self::KmerSizeTooSmall { .. }
                | Self::InvalidOptions(_)
        )
    }
}

impl From<serde_json::Error> for KmerPlotError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidOptions(format!("JSON parsing error: {}", err))
    }
}

/// Result type for kmerplot core operations
pub type Result<T> = std::result::Result<T, KmerPlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KmerPlotError::missing_color("Past_end");
        assert_eq!(err.to_string(), "No color configured for category 'Past_end'");
        assert!(err.is_config_error());
    }

    #[test]
    fn test_identifier_error_is_not_config() {
        let err = KmerPlotError::malformed_identifier("abc", "too few fields");
        assert!(!err.is_config_error());
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KmerPlotError = io_err.into();
        assert!(matches!(err, KmerPlotError::Io(_)));
    }
}
