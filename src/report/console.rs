//! Console sections printed while the pipeline runs.
//!
//! Every function returns the text of one section so the driver decides
//! whether to print it.

use crate::analysis::species_distribution;
use crate::dataset::head;
use crate::models::{
    Attribute, ChartArtifact, CleaningReport, ColumnStats, Dataset, DatasetProfile, GroupSummary,
};

const RULE_WIDTH: usize = 80;

/// Stage banner framed by double rules.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{}\n{}\n{}\n", rule, title.to_uppercase(), rule)
}

fn heading(title: &str) -> String {
    format!("\n{}\n{}\n", title, "-".repeat(RULE_WIDTH))
}

/// Shape, preview, column types and missing values of the raw data.
pub fn inspection(dataset: &Dataset, profile: &DatasetProfile, head_rows: usize) -> String {
    let mut out = String::new();

    out.push_str("\n✓ Dataset loaded successfully!\n");
    out.push_str(&format!("  Rows: {}\n", profile.rows));
    out.push_str(&format!("  Columns: {}\n", profile.columns));

    out.push_str(&heading(&format!("FIRST {} ROWS", head_rows.min(profile.rows))));
    out.push_str(&head(dataset, head_rows));
    out.push_str(&format!("\n... {} rows in total ...\n", profile.rows));

    out.push_str(&heading("STRUCTURE AND DATA TYPES"));
    for (name, ty) in &profile.column_types {
        out.push_str(&format!("{:<20} {}\n", name, ty));
    }

    out.push_str(&heading("MISSING VALUES"));
    for (name, missing) in &profile.missing_by_column {
        out.push_str(&format!("{:<20} {}\n", name, missing));
    }
    out.push_str(&format!("\nTotal missing values: {}\n", profile.total_missing));
    if profile.total_missing == 0 {
        out.push_str("✓ No missing values detected!\n");
    }

    out
}

/// What the cleaner did.
pub fn cleaning(profile: &DatasetProfile, report: &CleaningReport, clean: &Dataset) -> String {
    let mut out = String::new();

    out.push_str(&format!("\nDuplicate rows: {}\n", profile.duplicate_rows));
    if report.duplicates_removed > 0 {
        out.push_str(&format!("✓ {} duplicates removed\n", report.duplicates_removed));
    } else {
        out.push_str("✓ No duplicates found\n");
    }

    if report.values_filled > 0 {
        out.push_str(&format!(
            "✓ {} missing values filled with the column median\n",
            report.values_filled
        ));
        for (attr, value) in &report.fill_values {
            out.push_str(&format!("  {}: {:.2}\n", attr.column_name(), value));
        }
    } else {
        out.push_str("✓ No missing values to fill\n");
    }

    out.push_str(&format!(
        "\nDataset ready for analysis: {} rows, {} columns\n",
        clean.len(),
        profile.columns
    ));
    out
}

/// Describe table followed by a plain-language reading of each column.
pub fn statistics(stats: &[ColumnStats]) -> String {
    let mut out = heading("DESCRIPTIVE STATISTICS");

    out.push_str(&format!("{:<6}", ""));
    for s in stats {
        out.push_str(&format!(" {:>18}", s.attribute.column_name()));
    }
    out.push('\n');

    let rows: [(&str, fn(&ColumnStats) -> f64); 8] = [
        ("count", |s| s.count as f64),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q1),
        ("50%", |s| s.median),
        ("75%", |s| s.q3),
        ("max", |s| s.max),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{:<6}", label));
        for s in stats {
            out.push_str(&format!(" {:>18.6}", value(s)));
        }
        out.push('\n');
    }

    out.push_str(&heading("INTERPRETATION"));
    for s in stats {
        out.push_str(&format!("\n{}:\n", s.attribute.column_name()));
        out.push_str(&format!("  Mean: {:.2}\n", s.mean));
        out.push_str(&format!("  Median: {:.2}\n", s.median));
        out.push_str(&format!("  Std dev: {:.2}\n", s.std));
        out.push_str(&format!("  Min: {:.2}, Max: {:.2}\n", s.min, s.max));
        out.push_str(&format!("  IQR: Q1={:.2}, Q3={:.2}\n", s.q1, s.q3));
    }
    out
}

/// Per-species means, counts and the extended aggregate table.
pub fn groups(summary: &GroupSummary) -> String {
    let mut out = heading("MEANS BY SPECIES");
    out.push_str(&format!("{:<12}", "species"));
    for attr in Attribute::ALL {
        out.push_str(&format!(" {:>18}", attr.column_name()));
    }
    out.push('\n');
    for group in &summary.groups {
        out.push_str(&format!("{:<12}", group.species));
        for attr in Attribute::ALL {
            out.push_str(&format!(" {:>18.3}", group.aggregate(attr).mean));
        }
        out.push('\n');
    }

    out.push_str(&heading("OBSERVATIONS PER SPECIES"));
    for (species, count, _) in species_distribution(summary) {
        out.push_str(&format!("{:<12} {:>5}\n", species, count));
    }

    out.push_str(&heading("EXTENDED STATISTICS BY SPECIES"));
    for attr in Attribute::ALL {
        out.push_str(&format!(
            "\n{}\n{:<12} {:>8} {:>8} {:>8} {:>8}\n",
            attr.column_name(),
            "species",
            "mean",
            "std",
            "min",
            "max"
        ));
        for group in &summary.groups {
            let agg = group.aggregate(attr);
            out.push_str(&format!(
                "{:<12} {:>8.3} {:>8.3} {:>8.1} {:>8.1}\n",
                group.species, agg.mean, agg.std, agg.min, agg.max
            ));
        }
    }
    out
}

/// Numbered list of findings.
pub fn findings(lines: &[String]) -> String {
    let mut out = heading("PATTERNS AND FINDINGS");
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", i + 1, line));
    }
    out
}

/// Where each chart was written.
pub fn charts(artifacts: &[ChartArtifact]) -> String {
    let mut out = String::new();
    for artifact in artifacts {
        out.push_str(&format!(
            "✓ {} saved to '{}'\n",
            artifact.kind,
            artifact.path.display()
        ));
    }
    out
}
