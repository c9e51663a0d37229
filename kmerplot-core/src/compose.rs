//! Sample line composition and ordering

use crate::aggregate::AlignmentIndex;
use crate::classify::{Diagnostic, WindowClassifier};
use crate::error::Result;
use crate::options::{ColorTable, SortPolicy};
use crate::types::{Category, Position};

/// One classified window of a sample line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub window_start: Position,
    pub category: Category,
    pub color: String,
}

/// Classified windows of one sample, in ascending window order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLine {
    pub sample: String,
    pub cells: Vec<Cell>,
    /// Windows assigned to a gene of interest or `Both`
    pub relevance: usize,
}

impl SampleLine {
    pub fn category_keys(&self) -> Vec<&str> {
        self.cells.iter().map(|cell| cell.category.key()).collect()
    }

    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|cell| cell.color.as_str())
    }
}

/// Ordered sample lines plus every diagnostic raised while building them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    pub lines: Vec<SampleLine>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Classify every window of every sample and order the resulting lines
pub fn compose(
    index: &AlignmentIndex,
    windows: &[Position],
    genes_of_interest: &[String],
    colors: &ColorTable,
    sort_by: SortPolicy,
) -> Result<Composition> {
    let classifier = WindowClassifier::new(genes_of_interest, colors);
    let mut composition = Composition::default();

    for sample in index.samples() {
        let mut cells = Vec::with_capacity(windows.len());
        let mut relevance = 0;

        for &window_start in windows {
            let classification = classifier.classify(index, sample, window_start)?;
            if classification.category.is_relevant(genes_of_interest) {
                relevance += 1;
            }
            if let Some(diagnostic) = classification.diagnostic {
                composition.diagnostics.push(diagnostic);
            }
            cells.push(Cell {
                window_start,
                category: classification.category,
                color: classification.color,
            });
        }

        composition.lines.push(SampleLine {
            sample: sample.to_string(),
            cells,
            relevance,
        });
    }

    sort_lines(&mut composition.lines, sort_by);
    log::debug!(
        "Composed {} sample lines over {} windows ({} ambiguous windows)",
        composition.lines.len(),
        windows.len(),
        composition.diagnostics.len()
    );
    Ok(composition)
}

/// Order lines in place. Relevance ties fall back to sample name.
pub fn sort_lines(lines: &mut [SampleLine], sort_by: SortPolicy) {
    match sort_by {
        SortPolicy::ByRelevance => lines.sort_by(|a, b| {
            b.relevance
                .cmp(&a.relevance)
                .then_with(|| a.sample.cmp(&b.sample))
        }),
        SortPolicy::ByName => lines.sort_by(|a, b| a.sample.cmp(&b.sample)),
    }
}
