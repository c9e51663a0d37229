//! Plot options: genes of interest, color table, glyph and sort policy
//!
//! Options arrive as a JSON object with the keys `main_genes`, `colors`,
//! `kmer_shape` and `sort_by`. The color table keeps the order it was written
//! in, which is also the legend order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KmerPlotError, Result};
use crate::types::Category;

/// Default glyph drawn for each window
pub const DEFAULT_KMER_SHAPE: &str = "▉";

/// How sample lines are ordered in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortPolicy {
    /// Most windows matching a gene of interest (or `Both`) first
    #[default]
    ByRelevance,
    /// Sample name, ascending
    ByName,
}

impl SortPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortPolicy::ByRelevance => "by_relevance",
            SortPolicy::ByName => "by_name",
        }
    }
}

impl FromStr for SortPolicy {
    type Err = KmerPlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "by_relevance" | "colored_blocks" => Ok(SortPolicy::ByRelevance),
            "by_name" | "sample" => Ok(SortPolicy::ByName),
            other => Err(KmerPlotError::UnknownSortPolicy(other.to_string())),
        }
    }
}

impl TryFrom<String> for SortPolicy {
    type Error = KmerPlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SortPolicy> for String {
    fn from(policy: SortPolicy) -> Self {
        policy.as_str().to_string()
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping from category key to display color
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTable {
    colors: IndexMap<String, String>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, keeps first-insertion order
    pub fn with(mut self, key: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(key.into(), color.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }

    /// Color for a category; a missing entry is a configuration error
    pub fn color(&self, category: &Category) -> Result<&str> {
        self.get(category.key())
            .ok_or_else(|| KmerPlotError::missing_color(category.key()))
    }

    /// Entries in legend order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Ensure every gene of interest and every reserved category has a color
    pub fn validate(&self, genes_of_interest: &[String]) -> Result<()> {
        let required = genes_of_interest
            .iter()
            .map(String::as_str)
            .chain(Category::reserved_keys());
        for key in required {
            if !self.colors.contains_key(key) {
                return Err(KmerPlotError::missing_color(key));
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for ColorTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self { colors: iter.into_iter().collect() }
    }
}

/// Fallback values for options the JSON leaves out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotDefaults {
    pub kmer_shape: String,
    pub sort_by: SortPolicy,
}

impl Default for PlotDefaults {
    fn default() -> Self {
        Self {
            kmer_shape: DEFAULT_KMER_SHAPE.to_string(),
            sort_by: SortPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPlotOptions {
    main_genes: Vec<String>,
    colors: ColorTable,
    #[serde(default)]
    kmer_shape: Option<String>,
    #[serde(default)]
    sort_by: Option<String>,
}

/// Validated plot options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotOptions {
    pub main_genes: Vec<String>,
    pub colors: ColorTable,
    pub kmer_shape: String,
    pub sort_by: SortPolicy,
}

impl PlotOptions {
    pub fn new(main_genes: Vec<String>, colors: ColorTable) -> Self {
        Self {
            main_genes,
            colors,
            kmer_shape: DEFAULT_KMER_SHAPE.to_string(),
            sort_by: SortPolicy::default(),
        }
    }

    pub fn with_kmer_shape(mut self, kmer_shape: impl Into<String>) -> Self {
        self.kmer_shape = kmer_shape.into();
        self
    }

    /// Parse and validate options using the built-in defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json, &PlotDefaults::default())
    }

    /// Parse and validate options. Single quotes are accepted in place of
    /// double quotes so options can be passed unescaped on a command line.
    pub fn parse(json: &str, defaults: &PlotDefaults) -> Result<Self> {
        let normalized = json.replace('\'', "\"");
        let raw: RawPlotOptions = serde_json::from_str(&normalized)?;

        let sort_by = match raw.sort_by {
            Some(policy) => policy.parse()?,
            None => defaults.sort_by,
        };

        let options = Self {
            main_genes: raw.main_genes,
            colors: raw.colors,
            kmer_shape: raw.kmer_shape.unwrap_or_else(|| defaults.kmer_shape.clone()),
            sort_by,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.main_genes.is_empty() {
            return Err(KmerPlotError::InvalidOptions("main_genes must name at least one gene".into()));
        }
        if self.kmer_shape.is_empty() {
            return Err(KmerPlotError::InvalidOptions("kmer_shape must not be empty".into()));
        }
        self.colors.validate(&self.main_genes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: &str = r##"{
        "main_genes": ["KIR2DL1", "KIR2DL2"],
        "colors": {"KIR2DL1": "#1f77b4", "KIR2DL2": "#ff7f0e", "Both": "#2ca02c", "None": "#cccccc", "Past_end": "#ffffff"},
        "kmer_shape": "#",
        "sort_by": "by_name"
    }"##;

    #[test]
    fn test_parse_options() {
        let options = PlotOptions::from_json(OPTIONS).unwrap();
        assert_eq!(options.main_genes, vec!["KIR2DL1", "KIR2DL2"]);
        assert_eq!(options.kmer_shape, "#");
        assert_eq!(options.sort_by, SortPolicy::ByName);
        let keys: Vec<_> = options.colors.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["KIR2DL1", "KIR2DL2", "Both", "None", "Past_end"]);
    }

    #[test]
    fn test_single_quoted_options() {
        let json = "{'main_genes': ['A'], 'colors': {'A': 'red', 'Both': 'green', 'None': 'grey', 'Past_end': 'white'}}";
        let options = PlotOptions::from_json(json).unwrap();
        assert_eq!(options.kmer_shape, DEFAULT_KMER_SHAPE);
        assert_eq!(options.sort_by, SortPolicy::ByRelevance);
        assert_eq!(options.colors.get("A"), Some("red"));
    }

    #[test]
    fn test_defaults_applied() {
        let json = r#"{"main_genes": ["A"], "colors": {"A": "red", "Both": "green", "None": "grey", "Past_end": "white"}}"#;
        let defaults = PlotDefaults { kmer_shape: "*".into(), sort_by: SortPolicy::ByName };
        let options = PlotOptions::parse(json, &defaults).unwrap();
        assert_eq!(options.kmer_shape, "*");
        assert_eq!(options.sort_by, SortPolicy::ByName);
    }

    #[test]
    fn test_missing_reserved_color_rejected() {
        let json = r#"{"main_genes": ["A"], "colors": {"A": "red", "Both": "green", "None": "grey"}}"#;
        let err = PlotOptions::from_json(json).unwrap_err();
        assert!(matches!(err, KmerPlotError::MissingColor { ref key } if key == "Past_end"));
    }

    #[test]
    fn test_missing_gene_color_rejected() {
        let json = r#"{"main_genes": ["A", "B"], "colors": {"A": "red", "Both": "green", "None": "grey", "Past_end": "white"}}"#;
        let err = PlotOptions::from_json(json).unwrap_err();
        assert!(matches!(err, KmerPlotError::MissingColor { ref key } if key == "B"));
    }

    #[test]
    fn test_unknown_sort_policy_rejected() {
        let json = r#"{"main_genes": ["A"], "colors": {"A": "red", "Both": "green", "None": "grey", "Past_end": "white"}, "sort_by": "random"}"#;
        let err = PlotOptions::from_json(json).unwrap_err();
        assert!(matches!(err, KmerPlotError::UnknownSortPolicy(ref p) if p == "random"));
    }

    #[test]
    fn test_sort_policy_aliases() {
        assert_eq!("colored_blocks".parse::<SortPolicy>().unwrap(), SortPolicy::ByRelevance);
        assert_eq!("sample".parse::<SortPolicy>().unwrap(), SortPolicy::ByName);
        assert_eq!(SortPolicy::ByName.to_string(), "by_name");
    }

    #[test]
    fn test_color_lookup_by_category() {
        let table = ColorTable::new().with("A", "red").with("Past_end", "white");
        assert_eq!(table.color(&Category::PastEnd).unwrap(), "white");
        assert_eq!(table.color(&Category::Gene("A".into())).unwrap(), "red");
        assert!(table.color(&Category::Both).is_err());
    }
}
