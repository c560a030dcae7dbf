//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.irislens.toml` files.

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".irislens.toml";

/// Accepted chart resolution, in dots per inch.
pub const DPI_RANGE: std::ops::RangeInclusive<u32> = 10..=600;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory every output file is written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Rows shown in the dataset preview.
    #[serde(default = "default_head_rows")]
    pub head_rows: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            verbose: false,
            head_rows: default_head_rows(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_head_rows() -> usize {
    10
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Render charts at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Resolution in dots per inch.
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Font family used for every text element.
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Bins in the sepal length histogram.
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// File name of the four-panel dashboard.
    #[serde(default = "default_dashboard_file")]
    pub dashboard_file: String,

    /// File name of the correlation heatmap.
    #[serde(default = "default_heatmap_file")]
    pub heatmap_file: String,

    /// File name of the boxplot grid.
    #[serde(default = "default_boxplot_file")]
    pub boxplot_file: String,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dpi: default_dpi(),
            font_family: default_font_family(),
            histogram_bins: default_histogram_bins(),
            dashboard_file: default_dashboard_file(),
            heatmap_file: default_heatmap_file(),
            boxplot_file: default_boxplot_file(),
        }
    }
}

fn default_dpi() -> u32 {
    300
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

fn default_histogram_bins() -> usize {
    20
}

fn default_dashboard_file() -> String {
    "visualizations.png".to_string()
}

fn default_heatmap_file() -> String {
    "correlation_heatmap.png".to_string()
}

fn default_boxplot_file() -> String {
    "boxplots.png".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Write the report file.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Report file name, relative to the output directory.
    #[serde(default = "default_report_file")]
    pub file: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: OutputFormat::default(),
            file: default_report_file(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_report_file() -> PathBuf {
    PathBuf::from("analysis_report.md")
}

impl ReportConfig {
    /// Where the report is written.
    ///
    /// A JSON report left on the default file name gets a `.json` extension.
    pub fn path(&self, output_dir: &Path) -> PathBuf {
        let file = if self.format == OutputFormat::Json && self.file == default_report_file() {
            self.file.with_extension("json")
        } else {
            self.file.clone()
        };
        output_dir.join(file)
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.output_dir {
            self.general.output_dir = dir.clone();
        }
        if let Some(head) = args.head {
            self.general.head_rows = head;
        }

        if let Some(dpi) = args.dpi {
            self.charts.dpi = dpi;
        }
        if args.skip_charts {
            self.charts.enabled = false;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref file) = args.report {
            self.report.file = file.clone();
        }
        if args.no_report {
            self.report.enabled = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check values that can only come from a config file.
    pub fn validate(&self) -> Result<()> {
        if !DPI_RANGE.contains(&self.charts.dpi) {
            bail!(
                "Chart DPI must be between {} and {}, got {}",
                DPI_RANGE.start(),
                DPI_RANGE.end(),
                self.charts.dpi
            );
        }
        if self.charts.histogram_bins == 0 {
            bail!("Histogram bins must be at least 1");
        }
        if self.general.head_rows == 0 {
            bail!("Head rows must be at least 1");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
