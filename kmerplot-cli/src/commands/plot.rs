//! Plot command implementation - classify k-mer alignments and export the HTML report

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use kmerplot_core::{compose, read_alignment_file, AlignmentIndex, Composition, PlotOptions};
use kmerplot_render::{HtmlExporter, ReportConfig};

use crate::config::Config;
use crate::error::CliError;

pub fn execute(config: &Config, alignments: PathBuf, plot_options: String, output: PathBuf) -> Result<Composition> {
    log::info!("Starting k-mer plot");
    log::info!("Input alignments: {}", alignments.display());
    log::info!("Output file: {}", output.display());

    if !alignments.exists() {
        return Err(CliError::file_not_found(alignments).into());
    }

    let options = load_plot_options(config, &plot_options)?;
    log::info!(
        "Genes of interest: {} (sorting {})",
        options.main_genes.join(", "),
        options.sort_by
    );

    let records = read_alignment_file(&alignments)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to read alignments from {}", alignments.display()))?;

    let index = AlignmentIndex::from_records(records);
    if index.is_empty() {
        log::warn!("No alignment records in {}", alignments.display());
    }
    let windows = index.window_range();
    log::info!(
        "{} samples, {} windows of {} bp",
        index.sample_count(),
        windows.len(),
        index.kmer_size().unwrap_or(0)
    );

    let composition = compose(&index, &windows, &options.main_genes, &options.colors, options.sort_by)
        .map_err(CliError::from)?;

    for diagnostic in &composition.diagnostics {
        log::warn!("{}", diagnostic);
    }
    if !composition.diagnostics.is_empty() {
        log::warn!("{} windows had more than one best-mapping gene", composition.diagnostics.len());
    }

    let report_config = ReportConfig {
        show_legend: config.plot.legend,
        show_footer: config.plot.footer,
        provenance_comment: Some(format!(
            "kmerplot {} plot {}",
            kmerplot_core::VERSION,
            alignments.display()
        )),
    };

    HtmlExporter::new(report_config)
        .export_html(&output, &composition.lines, &options)
        .map_err(|e| CliError::rendering(format!("{:#}", e)))?;

    Ok(composition)
}

/// Plot options are given inline as JSON, or as `@path` to a JSON file
fn load_plot_options(config: &Config, argument: &str) -> Result<PlotOptions> {
    let json = match argument.strip_prefix('@') {
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                return Err(CliError::file_not_found(path.to_path_buf()).into());
            }
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read plot options: {}", path.display()))?
        }
        None => argument.to_string(),
    };

    let defaults = config.plot.defaults()?;
    let options = PlotOptions::parse(&json, &defaults).map_err(CliError::from)?;
    Ok(options)
}
