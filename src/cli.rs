//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::DPI_RANGE;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// IrisLens - exploratory analysis of the Iris flower dataset
///
/// Loads the embedded Iris sample, cleans it, prints descriptive and
/// per-species statistics, renders three charts and writes a summary report.
///
/// Examples:
///   irislens
///   irislens --output-dir results --dpi 150
///   irislens --format json --report summary.json
///   irislens --skip-charts --quiet
///   irislens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory for charts and the report [default: .]
    ///
    /// Created if it does not exist. Existing chart files are overwritten.
    #[arg(short, long, value_name = "DIR", env = "IRISLENS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .irislens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (no console report, errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Report format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Report file name, relative to the output directory
    #[arg(long, value_name = "FILE", conflicts_with = "no_report")]
    pub report: Option<PathBuf>,

    /// Do not write a report file
    #[arg(long)]
    pub no_report: bool,

    /// Chart resolution in dots per inch (10 - 600) [default: 300]
    #[arg(long, value_name = "N")]
    pub dpi: Option<u32>,

    /// Rows shown in the dataset preview [default: 10]
    #[arg(long, value_name = "N")]
    pub head: Option<usize>,

    /// Run the analysis without rendering charts
    #[arg(long)]
    pub skip_charts: bool,

    /// Generate a default .irislens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(dpi) = self.dpi {
            if !DPI_RANGE.contains(&dpi) {
                return Err(format!(
                    "DPI must be between {} and {}",
                    DPI_RANGE.start(),
                    DPI_RANGE.end()
                ));
            }
        }

        if self.head == Some(0) {
            return Err("Head rows must be at least 1".to_string());
        }

        // The output directory may not exist yet, but must not be a file
        if let Some(ref dir) = self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!("Output path is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
