//! Markdown and JSON report generation.
//!
//! This module renders the [`AnalysisReport`] bundle into the file
//! written next to the charts.

use crate::models::{
    AnalysisReport, Attribute, CleaningReport, ColumnStats, CorrelationMatrix, DatasetProfile,
    GroupSummary, ReportMetadata,
};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Iris Dataset Analysis Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents());
    output.push_str(&generate_dataset_section(&report.profile, &report.cleaning));
    output.push_str(&generate_statistics_section(&report.statistics));
    output.push_str(&generate_groups_section(&report.groups));
    output.push_str(&generate_correlation_section(&report.correlation));
    output.push_str(&generate_findings_section(&report.findings));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows Loaded:** {}\n", metadata.rows_loaded));
    section.push_str(&format!("- **Rows After Cleaning:** {}\n", metadata.rows_clean));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    if !metadata.charts.is_empty() {
        section.push_str("- **Charts:**\n");
        for chart in &metadata.charts {
            section.push_str(&format!("  - {}: `{}`\n", chart.kind, chart.path.display()));
        }
    }
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents() -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    for (title, anchor) in [
        ("Metadata", "metadata"),
        ("Dataset", "dataset"),
        ("Descriptive Statistics", "descriptive-statistics"),
        ("Species Groups", "species-groups"),
        ("Correlation", "correlation"),
        ("Findings", "findings"),
    ] {
        toc.push_str(&format!("- [{}](#{})\n", title, anchor));
    }
    toc.push('\n');

    toc
}

/// Generate the dataset shape and cleaning section.
fn generate_dataset_section(profile: &DatasetProfile, cleaning: &CleaningReport) -> String {
    let mut section = String::new();

    section.push_str("## Dataset\n\n");
    section.push_str(&format!(
        "{} rows, {} columns. {} missing values, {} duplicate rows.\n\n",
        profile.rows, profile.columns, profile.total_missing, profile.duplicate_rows
    ));

    section.push_str("| Column | Type | Missing |\n");
    section.push_str("|:---|:---|:---:|\n");
    for ((name, ty), (_, missing)) in profile.column_types.iter().zip(&profile.missing_by_column) {
        section.push_str(&format!("| {} | {} | {} |\n", name, ty, missing));
    }
    section.push('\n');

    section.push_str("### Cleaning\n\n");
    section.push_str(&format!(
        "- Duplicates removed: {}\n- Values filled: {}\n",
        cleaning.duplicates_removed, cleaning.values_filled
    ));
    for (attr, value) in &cleaning.fill_values {
        section.push_str(&format!("  - {} filled with {:.2}\n", attr.column_name(), value));
    }
    section.push('\n');

    section
}

/// Generate the describe table.
fn generate_statistics_section(stats: &[ColumnStats]) -> String {
    let mut section = String::new();

    section.push_str("## Descriptive Statistics\n\n");
    section.push_str(
        "| Column | Count | Mean | Std | Min | 25% | 50% | 75% | Max |\n",
    );
    section.push_str("|:---|:---:|---:|---:|---:|---:|---:|---:|---:|\n");
    for s in stats {
        section.push_str(&format!(
            "| {} | {} | {:.3} | {:.3} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            s.attribute.column_name(),
            s.count,
            s.mean,
            s.std,
            s.min,
            s.q1,
            s.median,
            s.q3,
            s.max
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-species section.
fn generate_groups_section(summary: &GroupSummary) -> String {
    let mut section = String::new();

    section.push_str("## Species Groups\n\n");
    section.push_str("| Species | Count | Share |");
    for attr in Attribute::ALL {
        section.push_str(&format!(" Mean {} |", attr.title()));
    }
    section.push_str("\n|:---|:---:|:---:|");
    section.push_str(&"---:|".repeat(Attribute::ALL.len()));
    section.push('\n');

    for group in &summary.groups {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |",
            group.species, group.count, group.percentage
        ));
        for attr in Attribute::ALL {
            section.push_str(&format!(" {:.3} |", group.aggregate(attr).mean));
        }
        section.push('\n');
    }
    section.push('\n');

    section
}

/// Generate the correlation matrix table.
fn generate_correlation_section(matrix: &CorrelationMatrix) -> String {
    let mut section = String::new();

    section.push_str("## Correlation\n\n");
    section.push_str("| |");
    for attr in Attribute::ALL {
        section.push_str(&format!(" {} |", attr.title()));
    }
    section.push_str("\n|:---|");
    section.push_str(&":---:|".repeat(Attribute::ALL.len()));
    section.push('\n');

    for row in Attribute::ALL {
        section.push_str(&format!("| **{}** |", row.title()));
        for col in Attribute::ALL {
            section.push_str(&format!(" {:.2} |", matrix.get(row, col)));
        }
        section.push('\n');
    }
    section.push('\n');

    section
}

/// Generate the findings section.
fn generate_findings_section(findings: &[String]) -> String {
    if findings.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Findings\n\n");
    for (i, finding) in findings.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, finding));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "---\n\n*Report generated by IrisLens v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write already rendered report content to `path`, replacing any existing file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report file {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{clean, correlation_matrix, describe, findings, group_by_species};
    use crate::dataset::{load_iris, profile};
    use crate::models::{ChartArtifact, ChartKind};
    use chrono::Utc;
    use std::path::PathBuf;

    fn create_test_report() -> AnalysisReport {
        let raw = load_iris().unwrap();
        let profile = profile(&raw);
        let (ds, cleaning) = clean(&raw);
        let groups = group_by_species(&ds);

        AnalysisReport {
            metadata: ReportMetadata {
                analysis_date: Utc::now(),
                rows_loaded: raw.len(),
                rows_clean: ds.len(),
                charts: vec![ChartArtifact {
                    kind: ChartKind::Heatmap,
                    path: PathBuf::from("out/correlation_heatmap.png"),
                }],
                duration_seconds: 1.5,
            },
            profile,
            cleaning,
            statistics: describe(&ds),
            findings: findings(&groups),
            correlation: correlation_matrix(&ds),
            groups,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Iris Dataset Analysis Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Descriptive Statistics"));
        assert!(markdown.contains(
            "| sepal length (cm) | 150 | 5.843 | 0.828 |"
        ));
        assert!(markdown.contains("| setosa | 50 | 33.3% |"));
        assert!(markdown.contains("0.87"));
        assert!(markdown.contains(
            "Largest mean sepal length: virginica (6.59 cm)"
        ));
        assert!(markdown.contains("out/correlation_heatmap.png"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let metadata = ReportMetadata {
            analysis_date: Utc::now(),
            rows_loaded: 152,
            rows_clean: 150,
            charts: Vec::new(),
            duration_seconds: 0.25,
        };

        let section = generate_metadata_section(&metadata);

        assert!(section.contains("Rows Loaded:** 152"));
        assert!(section.contains("Rows After Cleaning:** 150"));
        assert!(!section.contains("Charts"));
    }

    #[test]
    fn test_empty_findings_are_omitted() {
        assert!(generate_findings_section(&[]).is_empty());
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"groups\""));
        assert!(json.contains("\"findings\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["groups"]["total"], 150);
    }

    #[test]
    fn test_write_report_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report("first", &path).unwrap();
        write_report("second", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }
}
