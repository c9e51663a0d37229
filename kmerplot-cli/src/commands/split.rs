//! Split command implementation - divide sequences into tagged k-mer windows

use anyhow::{Context, Result};
use std::path::PathBuf;

use kmerplot_core::{EncodeStats, WindowEncoder};

use crate::config::Config;
use crate::error::CliError;

pub fn execute(config: &Config, input: PathBuf, output: PathBuf, kmer_size: Option<usize>) -> Result<EncodeStats> {
    log::info!("Splitting sequences into k-mer windows");
    log::info!("Input sequences: {}", input.display());
    log::info!("Output file: {}", output.display());

    if !input.exists() {
        return Err(CliError::file_not_found(input).into());
    }

    let kmer_size = kmer_size.unwrap_or(config.split.kmer_size);
    let encoder = WindowEncoder::new(kmer_size, config.split.min_kmer_size).map_err(CliError::from)?;
    log::info!("K-mer size: {} bp", encoder.kmer_size());

    let stats = encoder
        .encode_file(&input, &output)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to split {}", input.display()))?;

    log::info!(
        "Split {} sequences into {} windows",
        stats.sequences,
        stats.windows
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_split_with_config_default() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("samples.fa");
        let output = dir.path().join("kmers.fa");
        std::fs::write(&input, format!(">s1\n{}\n", "A".repeat(250))).unwrap();

        let stats = execute(&Config::default(), input, output.clone(), None).unwrap();
        assert_eq!(stats.windows, 3);

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with(">s1_0_to_99\n"));
        assert!(written.contains(">s1_200_to_249\n"));
    }

    #[test]
    fn test_kmer_size_below_minimum_is_validation_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("samples.fa");
        std::fs::write(&input, ">s1\nACGT\n").unwrap();

        let err = execute(&Config::default(), input, dir.path().join("out.fa"), Some(50)).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Validation { .. })));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let err = execute(
            &Config::default(),
            dir.path().join("absent.fa"),
            dir.path().join("out.fa"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::FileNotFound { .. })));
    }

    #[test]
    fn test_lower_minimum_from_config() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("samples.fa");
        let output = dir.path().join("kmers.fa");
        std::fs::write(&input, ">s1\nACGTACGTAC\n").unwrap();

        let mut config = Config::default();
        config.split.min_kmer_size = 4;
        let stats = execute(&config, input, output.clone(), Some(4)).unwrap();
        assert_eq!(stats.windows, 3);
        assert!(std::fs::read_to_string(&output).unwrap().ends_with(">s1_8_to_9\nAC\n"));
    }
}
