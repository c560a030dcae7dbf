//! IrisLens - exploratory analysis of the Iris flower dataset
//!
//! A CLI tool that loads the embedded Iris sample, cleans it, computes
//! descriptive, per-species and correlation statistics, renders three
//! charts and writes a summary report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Dataset failed to load, invalid arguments, or any other fatal error

mod analysis;
mod charts;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;
mod stats;

use anyhow::{Context, Result};
use charts::{ChartInput, ChartStyle};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use error::LoadError;
use indicatif::{ProgressBar, ProgressStyle};
use models::{AnalysisReport, Dataset, ReportMetadata};
use report::console;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Source of the dataset the pipeline analyses.
type Loader = fn() -> Result<Dataset, LoadError>;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config(Path::new(DEFAULT_CONFIG_FILE));
    }

    let (config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(log_level(&args, &config))?;

    info!("IrisLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    match run_analysis(&config, args.quiet, dataset::load_iris) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: write the default configuration file.
fn handle_init_config(path: &Path) -> Result<()> {
    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    write_default_config(path)?;

    println!("✅ Created {} with default settings.", path.display());
    println!("   Edit it to customize the output directory, chart style and report.");
    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Effective log level; the config file can turn on verbose output.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Returns the config together with the file it came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        (Config::load(config_path)?, Some(config_path.clone()))
    } else {
        match Config::load_default()? {
            Some(config) => (config, Some(PathBuf::from(DEFAULT_CONFIG_FILE))),
            None => (Config::default(), None),
        }
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok((config, source))
}

/// Run the complete analysis on the dataset from `load`.
///
/// Returns the process exit code: 1 when the dataset fails to load.
fn run_analysis(config: &Config, quiet: bool, load: Loader) -> Result<i32> {
    let start_time = Instant::now();
    let show = |text: &str| {
        if !quiet {
            print!("{}", text);
        }
    };

    // Step 1: Load and inspect
    show(&console::banner("Section 1: Load and inspect the dataset"));
    let raw = match load() {
        Ok(ds) => ds,
        Err(e) => {
            error!("Dataset load failed: {}", e);
            eprintln!("✗ Failed to load dataset: {}", e);
            return Ok(1);
        }
    };
    let profile = dataset::profile(&raw);
    show(&console::inspection(&raw, &profile, config.general.head_rows));

    // Step 2: Clean
    show(&console::banner("Section 2: Clean and prepare the data"));
    let (clean, cleaning) = analysis::clean(&raw);
    info!(
        "Cleaned dataset: {} rows ({} duplicates removed, {} values filled)",
        clean.len(),
        cleaning.duplicates_removed,
        cleaning.values_filled
    );
    show(&console::cleaning(&profile, &cleaning, &clean));

    // Step 3: Describe
    show(&console::banner("Section 3: Basic statistical analysis"));
    let statistics = analysis::describe(&clean);
    show(&console::statistics(&statistics));

    // Step 4: Group and aggregate
    show(&console::banner("Section 4: Grouping and aggregation"));
    let groups = analysis::group_by_species(&clean);
    let findings = analysis::findings(&groups);
    show(&console::groups(&groups));
    show(&console::findings(&findings));

    let correlation = analysis::correlation_matrix(&clean);
    debug!("Correlation matrix: {:?}", correlation.values);

    // Step 5: Charts
    let output_dir = &config.general.output_dir;
    let chart_files = if config.charts.enabled {
        show(&console::banner("Section 5: Visualizations"));
        let input = ChartInput {
            dataset: &clean,
            groups: &groups,
            correlation: &correlation,
        };
        let style = ChartStyle::from(&config.charts);

        let spinner = if quiet { None } else { Some(chart_spinner()?) };
        let artifacts = charts::render_all(
            &input,
            &config.charts,
            &style,
            output_dir,
            spinner.as_ref(),
        );
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        let artifacts = artifacts?;
        show(&console::charts(&artifacts));
        artifacts
    } else {
        info!("Chart rendering skipped");
        Vec::new()
    };

    // Step 6: Report
    let report = AnalysisReport {
        metadata: ReportMetadata {
            analysis_date: Utc::now(),
            rows_loaded: raw.len(),
            rows_clean: clean.len(),
            charts: chart_files,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        profile,
        cleaning,
        statistics,
        groups,
        correlation,
        findings,
    };

    if config.report.enabled {
        let path = config.report.path(output_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create report directory {}", parent.display())
            })?;
        }
        let content = match config.report.format {
            OutputFormat::Json => report::generate_json_report(&report)?,
            OutputFormat::Markdown => report::generate_markdown_report(&report),
        };
        report::write_report(&content, &path)?;
        info!("Report written to {}", path.display());
        show(&format!("\n📝 Report saved to: {}\n", path.display()));
    }

    show(&format!(
        "\n✅ Analysis complete in {:.1}s\n",
        start_time.elapsed().as_secs_f64()
    ));
    Ok(0)
}

/// Spinner shown while the charts render.
fn chart_spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid spinner template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_full_run_writes_charts_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.output_dir = dir.path().join("out");
        config.charts.dpi = 30;

        let code = run_analysis(&config, true, dataset::load_iris).unwrap();
        assert_eq!(code, 0);

        for file in [
            "visualizations.png",
            "correlation_heatmap.png",
            "boxplots.png",
        ] {
            let meta = std::fs::metadata(config.general.output_dir.join(file)).unwrap();
            assert!(meta.len() > 0, "{} is empty", file);
        }
        let report =
            std::fs::read_to_string(config.general.output_dir.join("analysis_report.md")).unwrap();
        assert!(report.contains("| setosa | 50 | 33.3% |"));
        assert!(report.contains("| versicolor | 50 | 33.3% |"));
        assert!(report.contains("| virginica | 50 | 33.3% |"));
    }

    fn unreadable_source() -> Result<Dataset, LoadError> {
        dataset::loader::load_from_str("sepal_length,species\n5.1,setosa\n")
    }

    #[test]
    fn test_load_failure_exits_with_one_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.output_dir = dir.path().join("out");
        config.charts.dpi = 30;

        let code = run_analysis(&config, true, unreadable_source).unwrap();
        assert_eq!(code, 1);
        assert!(!config.general.output_dir.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_report_in_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.output_dir = dir.path().to_path_buf();
        config.charts.enabled = false;
        config.report.file = PathBuf::from("sub/nested/report.md");

        assert_eq!(run_analysis(&config, true, dataset::load_iris).unwrap(), 0);
        let report = std::fs::read_to_string(dir.path().join("sub/nested/report.md")).unwrap();
        assert!(report.contains("# Iris Dataset Analysis Report"));
    }

    #[test]
    fn test_json_report_without_charts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.output_dir = dir.path().to_path_buf();
        config.charts.enabled = false;
        config.report.format = OutputFormat::Json;

        assert_eq!(run_analysis(&config, true, dataset::load_iris).unwrap(), 0);
        assert!(!dir.path().join("visualizations.png").exists());

        let json = std::fs::read_to_string(dir.path().join("analysis_report.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["rows_clean"], 150);
        assert_eq!(value["groups"]["groups"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_no_report_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.output_dir = dir.path().to_path_buf();
        config.charts.enabled = false;
        config.report.enabled = false;

        assert_eq!(run_analysis(&config, true, dataset::load_iris).unwrap(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[charts]\ndpi = 72\n").unwrap();

        let mut args = make_args();
        args.config = Some(path.clone());
        args.head = Some(3);
        let (config, source) = load_config(&args).unwrap();
        assert_eq!(config.charts.dpi, 72);
        assert_eq!(config.general.head_rows, 3);
        assert_eq!(source, Some(path));

        std::fs::write(dir.path().join("custom.toml"), "[charts]\ndpi = 1\n").unwrap();
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_verbose_config_raises_log_level() {
        let mut config = Config::default();
        let mut args = make_args();
        assert_eq!(log_level(&args, &config), tracing::Level::INFO);

        config.general.verbose = true;
        assert_eq!(log_level(&args, &config), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(log_level(&args, &config), tracing::Level::ERROR);
    }

    #[test]
    fn test_default_config_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        write_default_config(&path).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.charts.boxplot_file, "boxplots.png");
        assert!(config.validate().is_ok());
    }
}
