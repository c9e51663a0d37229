//! Window-color classification
//!
//! Decides one category per (sample, window) from the aggregated hits:
//!
//! 1. window never observed for the sample: `Past_end`
//! 2. observed with no mapped hit: `None`
//! 3. every gene of interest among the top-quality genes: `Both`
//! 4. otherwise the top-quality gene, preferring genes of interest; ties are
//!    broken by taking the lexicographically smallest name and reported as a
//!    [`Diagnostic`]

use std::collections::BTreeSet;
use std::fmt;

use crate::aggregate::{AlignmentIndex, WindowHits};
use crate::error::Result;
use crate::options::ColorTable;
use crate::types::{Category, Position};

/// Non-fatal data-quality note raised while classifying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub sample: String,
    pub window_start: Position,
    /// Tied candidate genes, sorted
    pub candidates: Vec<String>,
    /// Candidate the window was assigned to
    pub chosen: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ambiguous best-mapping gene for {}, index {}: {} (using {})",
            self.sample,
            self.window_start,
            self.candidates.join(", "),
            self.chosen
        )
    }
}

/// Category and resolved color for one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub color: String,
    pub diagnostic: Option<Diagnostic>,
}

/// Category for a window's hits, plus the tied candidates when the choice
/// among them was arbitrary. `None` hits means the window was never observed.
pub fn categorize(hits: Option<&WindowHits>, genes_of_interest: &[String]) -> (Category, Option<Vec<String>>) {
    let hits = match hits {
        Some(hits) => hits,
        None => return (Category::PastEnd, None),
    };
    let max_quality = match hits.iter().map(|(_, quality)| *quality).max() {
        Some(max_quality) => max_quality,
        None => return (Category::NoAlignment, None),
    };

    let best: BTreeSet<&str> = hits
        .iter()
        .filter(|(_, quality)| *quality == max_quality)
        .map(|(gene, _)| gene.as_str())
        .collect();

    if genes_of_interest.iter().all(|gene| best.contains(gene.as_str())) {
        return (Category::Both, None);
    }

    let preferred: BTreeSet<&str> = best
        .iter()
        .copied()
        .filter(|gene| genes_of_interest.iter().any(|g| g.as_str() == *gene))
        .collect();
    let candidates = if preferred.is_empty() { best } else { preferred };

    // BTreeSet iterates in ascending order, so the first candidate is the smallest
    let mut names = candidates.into_iter();
    let chosen = match names.next() {
        Some(gene) => gene.to_string(),
        None => return (Category::NoAlignment, None),
    };
    let tied: Vec<String> = names.map(str::to_string).collect();
    if tied.is_empty() {
        (Category::Gene(chosen), None)
    } else {
        let mut all = Vec::with_capacity(tied.len() + 1);
        all.push(chosen.clone());
        all.extend(tied);
        (Category::Gene(chosen), Some(all))
    }
}

/// Classifier bound to one set of genes of interest and one color table
#[derive(Debug, Clone, Copy)]
pub struct WindowClassifier<'a> {
    genes_of_interest: &'a [String],
    colors: &'a ColorTable,
}

impl<'a> WindowClassifier<'a> {
    pub fn new(genes_of_interest: &'a [String], colors: &'a ColorTable) -> Self {
        Self { genes_of_interest, colors }
    }

    pub fn classify(&self, index: &AlignmentIndex, sample: &str, window_start: Position) -> Result<Classification> {
        let (category, tied) = categorize(index.window(sample, window_start), self.genes_of_interest);
        let color = self.colors.color(&category)?.to_string();

        let diagnostic = tied.map(|candidates| Diagnostic {
            sample: sample.to_string(),
            window_start,
            chosen: category.key().to_string(),
            candidates,
        });

        Ok(Classification { category, color, diagnostic })
    }
}

/// Classify a single window
pub fn classify(
    index: &AlignmentIndex,
    sample: &str,
    window_start: Position,
    genes_of_interest: &[String],
    colors: &ColorTable,
) -> Result<Classification> {
    WindowClassifier::new(genes_of_interest, colors).classify(index, sample, window_start)
}
