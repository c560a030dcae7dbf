//! Structural inspection of a freshly loaded dataset.

use crate::analysis::count_duplicates;
use crate::models::{Attribute, Dataset, DatasetProfile, Record};

/// Name and type of the non-numeric columns, after the four measurements.
const EXTRA_COLUMNS: [(&str, &str); 2] = [("species", "category"), ("date", "date")];

/// Build the structural profile of a dataset.
pub fn profile(dataset: &Dataset) -> DatasetProfile {
    let mut column_types: Vec<(String, String)> = Attribute::ALL
        .iter()
        .map(|a| (a.column_name().to_string(), "f64".to_string()))
        .collect();
    column_types.extend(
        EXTRA_COLUMNS
            .iter()
            .map(|(name, ty)| (name.to_string(), ty.to_string())),
    );

    // Species and date are never missing once a row has loaded.
    let mut missing_by_column: Vec<(String, usize)> = Attribute::ALL
        .iter()
        .map(|a| (a.column_name().to_string(), dataset.missing_in(*a)))
        .collect();
    missing_by_column.extend(EXTRA_COLUMNS.iter().map(|(name, _)| (name.to_string(), 0)));

    DatasetProfile {
        rows: dataset.len(),
        columns: column_types.len(),
        column_types,
        missing_by_column,
        total_missing: dataset.missing_count(),
        duplicate_rows: count_duplicates(dataset),
    }
}

/// First `n` records formatted as a fixed-width table.
pub fn head(dataset: &Dataset, n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>5}", ""));
    for attr in Attribute::ALL {
        out.push_str(&format!(" {:>18}", attr.column_name()));
    }
    out.push_str(&format!(" {:>11} {:>11}\n", "species", "date"));

    for (i, record) in dataset.records.iter().take(n).enumerate() {
        out.push_str(&format_row(i, record));
        out.push('\n');
    }
    out
}

fn format_row(index: usize, record: &Record) -> String {
    let mut row = format!("{:>5}", index);
    for attr in Attribute::ALL {
        match record.get(attr) {
            Some(v) => row.push_str(&format!(" {:>18.1}", v)),
            None => row.push_str(&format!(" {:>18}", "NaN")),
        }
    }
    row.push_str(&format!(" {:>11} {:>11}", record.species, record.date));
    row
}
