//! Loading the embedded Iris sample.
//!
//! The sample is compiled into the binary, so loading never touches the
//! file system. Each record receives a synthetic date derived from its row
//! index.

use crate::error::LoadError;
use crate::models::{Dataset, Record, Species};
use chrono::{Days, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{debug, info};

/// The 150-row Iris sample, 50 rows per species.
const IRIS_CSV: &str = include_str!("../../data/iris.csv");

/// Expected header line of the sample source.
pub const HEADER: &str = "sepal_length,sepal_width,petal_length,petal_width,species";

/// Days between consecutive synthetic dates.
pub const DATE_STRIDE_DAYS: u64 = 2;

/// One row of the source as written, before numbers are parsed.
#[derive(Debug, Deserialize)]
struct RawRow {
    sepal_length: String,
    sepal_width: String,
    petal_length: String,
    petal_width: String,
    species: String,
}

impl RawRow {
    /// Measurement fields paired with their column names, in column order.
    fn measurements(&self) -> [(&'static str, &str); 4] {
        [
            ("sepal_length", self.sepal_length.as_str()),
            ("sepal_width", self.sepal_width.as_str()),
            ("petal_length", self.petal_length.as_str()),
            ("petal_width", self.petal_width.as_str()),
        ]
    }
}

/// Date assigned to the first record.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Load the standard sample.
pub fn load_iris() -> Result<Dataset, LoadError> {
    let dataset = load_from_str(IRIS_CSV)?;
    info!("Loaded {} records from the embedded sample", dataset.len());
    Ok(dataset)
}

/// Parse a sample source in the embedded CSV layout.
///
/// Fields may be quoted and are trimmed; blank lines are skipped. An empty
/// or `nan` numeric field loads as a missing value.
pub fn load_from_str(source: &str) -> Result<Dataset, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(source.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }
    let found = headers.iter().collect::<Vec<_>>().join(",");
    if found != HEADER {
        return Err(LoadError::Header {
            expected: HEADER.to_string(),
            found,
        });
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let record = parse_row(&row, &headers, records.len())?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(LoadError::NoRows);
    }

    debug!(
        "Parsed {} rows, dates {} .. {}",
        records.len(),
        records[0].date,
        records[records.len() - 1].date
    );

    Ok(Dataset::new(records))
}

fn parse_row(
    row: &StringRecord,
    headers: &StringRecord,
    index: usize,
) -> Result<Record, LoadError> {
    let line = row.position().map_or(0, |p| p.line() as usize);
    let raw: RawRow = row.deserialize(Some(headers)).map_err(csv_error)?;

    let mut measurements = [None; 4];
    for (slot, (column, value)) in measurements.iter_mut().zip(raw.measurements()) {
        *slot = parse_measurement(value, line, column)?;
    }

    let species: Species = raw
        .species
        .parse()
        .map_err(|reason| LoadError::InvalidSpecies { line, reason })?;

    Ok(Record {
        measurements,
        species,
        date: synthetic_date(index)?,
    })
}

/// Date of the record at `row`: the start date plus a fixed stride per row.
pub fn synthetic_date(row: usize) -> Result<NaiveDate, LoadError> {
    let offset = (row as u64)
        .checked_mul(DATE_STRIDE_DAYS)
        .ok_or(LoadError::DateOverflow { row })?;
    start_date()
        .checked_add_days(Days::new(offset))
        .ok_or(LoadError::DateOverflow { row })
}

fn parse_measurement(raw: &str, line: usize, column: &str) -> Result<Option<f64>, LoadError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| LoadError::InvalidNumber {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn csv_error(err: csv::Error) -> LoadError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len,
            len,
            ..
        } => LoadError::FieldCount {
            line,
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => LoadError::Malformed {
            line,
            reason: err.to_string(),
        },
    }
}
