use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "kmerplot")]
#[command(about = "K-mer best-gene mapping plots")]
#[command(version)]
#[command(long_about = "
kmerplot splits sample sequences into k-mer windows and, once those windows
have been aligned against a set of genes, plots which gene each window maps
best to, one colored row per sample.

Examples:
  kmerplot split samples.fa kmers.fa -k 100
  kmerplot plot kmers.bam \"{'main_genes': ['KIR2DL1', 'KIR2DL2'], 'colors': {...}}\" plot.html
  kmerplot plot kmers.sam @plot_options.json plot.html
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (defaults to ./kmerplot.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Divide FASTA/FASTQ sequences into k-mer windows named <sample>_<start>_to_<end>
    Split {
        /// Input sequences (FASTA/FASTQ, optionally gzipped)
        fasta: PathBuf,

        /// Output FASTA of k-mer windows
        out: PathBuf,

        /// K-mer size in base pairs
        #[arg(short, long)]
        kmer_size: Option<usize>,
    },

    /// Plot the best-mapping gene of every k-mer window as an HTML report
    Plot {
        /// SAM/BAM of k-mer windows aligned to the genes of interest
        sam: PathBuf,

        /// Plot options as JSON ("main_genes", "colors", "kmer_shape", "sort_by"), or @FILE
        plot_options: String,

        /// Output HTML file
        out: PathBuf,
    },

    /// Print an example kmerplot.toml, or write it to a file
    Config {
        /// Write the example to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}

/// Parse arguments; an incomplete command line prints usage and exits cleanly
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::MissingRequiredArgument
            | ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = err.print();
                std::process::exit(0);
            }
            _ => err.exit(),
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Split { fasta, out, kmer_size } => {
            commands::split::execute(&config, fasta, out, kmer_size)?;
        }

        Commands::Plot { sam, plot_options, out } => {
            commands::plot::execute(&config, sam, plot_options, out)?;
        }

        Commands::Config { output } => {
            commands::config::execute(output)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = parse_args();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            if err.chain().count() > 1 {
                eprintln!("Error: {}", err);
            }
            print_error_and_exit(cli_err);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
