//! Configuration handling for the kmerplot CLI
//!
//! Defaults come from kmerplot.toml (or `--config PATH`); command-line
//! arguments and the plot options JSON override them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use kmerplot_core::{PlotDefaults, SortPolicy, DEFAULT_KMER_SHAPE, DEFAULT_KMER_SIZE, DEFAULT_MIN_KMER_SIZE};

use crate::error::{CliError, CliResult};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "kmerplot.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub plot: PlotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Window size used when `--kmer-size` is not given
    #[serde(default = "default_kmer_size")]
    pub kmer_size: usize,

    /// Smallest accepted window size
    #[serde(default = "default_min_kmer_size")]
    pub min_kmer_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Glyph used when the plot options omit "kmer_shape"
    #[serde(default = "default_kmer_shape")]
    pub kmer_shape: String,

    /// Sample order used when the plot options omit "sort_by"
    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    /// Include the color legend below the sample table
    #[serde(default = "default_true")]
    pub legend: bool,

    /// Append a generation timestamp (makes output non-reproducible)
    #[serde(default)]
    pub footer: bool,
}

fn default_kmer_size() -> usize { DEFAULT_KMER_SIZE }
fn default_min_kmer_size() -> usize { DEFAULT_MIN_KMER_SIZE }
fn default_kmer_shape() -> String { DEFAULT_KMER_SHAPE.to_string() }
fn default_sort_by() -> String { SortPolicy::default().to_string() }
fn default_true() -> bool { true }

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            kmer_size: default_kmer_size(),
            min_kmer_size: default_min_kmer_size(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            kmer_shape: default_kmer_shape(),
            sort_by: default_sort_by(),
            legend: true,
            footer: false,
        }
    }
}

impl PlotConfig {
    /// Defaults applied to plot options that leave a field out
    pub fn defaults(&self) -> CliResult<PlotDefaults> {
        let sort_by = self
            .sort_by
            .parse::<SortPolicy>()
            .map_err(|e| CliError::config(format!("[plot] sort_by: {}", e)))?;
        if self.kmer_shape.is_empty() {
            return Err(CliError::config("[plot] kmer_shape must not be empty"));
        }
        Ok(PlotDefaults {
            kmer_shape: self.kmer_shape.clone(),
            sort_by,
        })
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate example configuration file content
    pub fn example_toml() -> CliResult<String> {
        Self::default().to_toml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.split.kmer_size, 100);
        assert_eq!(config.split.min_kmer_size, 100);
        assert_eq!(config.plot.kmer_shape, "▉");
        assert_eq!(config.plot.sort_by, "by_relevance");
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.split.kmer_size = 150;
        config.plot.sort_by = "by_name".to_string();
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;

        assert_eq!(config, loaded_config);
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[split]\nkmer_size = 250\n").unwrap();
        assert_eq!(config.split.kmer_size, 250);
        assert_eq!(config.split.min_kmer_size, 100);
        assert_eq!(config.plot, PlotConfig::default());
    }

    #[test]
    fn test_plot_defaults() {
        let mut plot = PlotConfig::default();
        plot.sort_by = "sample".to_string();
        let defaults = plot.defaults().unwrap();
        assert_eq!(defaults.sort_by, SortPolicy::ByName);

        plot.sort_by = "random".to_string();
        assert!(matches!(plot.defaults(), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_example_toml_generation() {
        let example = Config::example_toml().unwrap();
        assert!(example.contains("[split]"));
        assert!(example.contains("[plot]"));
        assert!(example.contains("kmer_size = 100"));
    }
}
