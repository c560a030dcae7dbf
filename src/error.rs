//! Error types for dataset loading.
//!
//! Loading is the only stage with a recognised failure mode; every other
//! stage reports failures through `anyhow`.

use thiserror::Error;

/// Reasons the sample dataset could not be produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The source held no header line.
    #[error("dataset source is empty")]
    Empty,

    /// The header did not name the expected columns.
    #[error("unexpected header: expected '{expected}', found '{found}'")]
    Header {
        /// Expected header line
        expected: String,
        /// Header line found in the source
        found: String,
    },

    /// A row had the wrong number of fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A numeric field could not be parsed.
    #[error("line {line}: invalid number '{value}' in column '{column}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    /// The species label was not recognised.
    #[error("line {line}: {reason}")]
    InvalidSpecies { line: usize, reason: String },

    /// The CSV reader rejected the source.
    #[error("line {line}: malformed CSV: {reason}")]
    Malformed { line: usize, reason: String },

    /// The header was present but no data rows followed.
    #[error("dataset source has no data rows")]
    NoRows,

    /// The synthetic date for a row fell outside the calendar.
    #[error("row {row}: synthetic date out of range")]
    DateOverflow { row: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_line() {
        let err = LoadError::FieldCount {
            line: 7,
            expected: 5,
            found: 3,
        };
        assert_eq!(err.to_string(), "line 7: expected 5 fields, found 3");

        let err = LoadError::InvalidNumber {
            line: 2,
            column: "sepal_width".to_string(),
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("'abc'"));
        assert!(err.to_string().contains("sepal_width"));
    }
}
