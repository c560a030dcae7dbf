//! Deduplication and missing-value imputation.

use crate::models::{Attribute, CleaningReport, Dataset, Record};
use crate::stats;
use tracing::{debug, info};

/// Count records that exactly duplicate an earlier record.
pub fn count_duplicates(dataset: &Dataset) -> usize {
    dataset.len() - dedup(&dataset.records).len()
}

/// Remove exact duplicates and fill missing values with the column median.
///
/// Medians are taken over the deduplicated records. A column with no values
/// at all is filled with `0.0`. Filling can turn a row into a copy of another,
/// so duplicates are dropped once more afterwards.
pub fn clean(dataset: &Dataset) -> (Dataset, CleaningReport) {
    if dataset.is_empty() {
        return (Dataset::default(), CleaningReport::default());
    }
    debug!(
        "{} of {} records have missing values",
        dataset.records.iter().filter(|r| r.has_missing()).count(),
        dataset.len()
    );

    let mut records = dedup(&dataset.records);
    let duplicates_removed = dataset.len() - records.len();

    let mut report = CleaningReport {
        duplicates_removed,
        ..Default::default()
    };

    let deduped = Dataset::new(records.clone());
    for attr in Attribute::ALL {
        let gaps = deduped.missing_in(attr);
        if gaps == 0 {
            continue;
        }

        let present = deduped.column(attr);
        let fill = if present.is_empty() {
            0.0
        } else {
            stats::median(&present)
        };
        debug!("Filling {} gaps in '{}' with {:.3}", gaps, attr, fill);

        for record in records.iter_mut() {
            let slot = &mut record.measurements[attr.index()];
            if slot.is_none() {
                *slot = Some(fill);
            }
        }
        report.values_filled += gaps;
        report.fill_values.push((attr, fill));
    }

    let before = records.len();
    let records = dedup(&records);
    report.duplicates_removed += before - records.len();

    info!(
        "Cleaning removed {} duplicates and filled {} missing values",
        report.duplicates_removed,
        report.values_filled
    );

    (Dataset::new(records), report)
}

/// Keep the first occurrence of every record, preserving order.
fn dedup(records: &[Record]) -> Vec<Record> {
    let mut kept: Vec<Record> = Vec::with_capacity(records.len());
    for record in records {
        if !kept.iter().any(|k| k.same_as(record)) {
            kept.push(record.clone());
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_iris;
    use crate::models::Species;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn record(values: [Option<f64>; 4], day: u32) -> Record {
        Record {
            measurements: values,
            species: Species::Setosa,
            date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
        }
    }

    #[test]
    fn test_standard_sample_is_already_clean() {
        let ds = load_iris().unwrap();
        let (clean_ds, report) = clean(&ds);
        assert_eq!(clean_ds.len(), 150);
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(report.values_filled, 0);
        assert!(report.fill_values.is_empty());
    }

    #[test]
    fn test_removes_duplicates_keeping_first() {
        let a = record([Some(1.0); 4], 1);
        let b = record([Some(2.0); 4], 2);
        let ds = Dataset::new(vec![a.clone(), b.clone(), a.clone(), b.clone(), a.clone()]);

        assert_eq!(count_duplicates(&ds), 3);
        let (clean_ds, report) = clean(&ds);
        assert_eq!(report.duplicates_removed, 3);
        assert_eq!(clean_ds.records, vec![a, b]);
    }

    #[test]
    fn test_fills_with_median_of_deduplicated_rows() {
        let ds = Dataset::new(vec![
            record([Some(1.0), Some(1.0), Some(1.0), Some(1.0)], 1),
            record([Some(2.0), Some(1.0), Some(1.0), Some(1.0)], 2),
            // duplicate of the row above, must not weigh on the median
            record([Some(2.0), Some(1.0), Some(1.0), Some(1.0)], 2),
            record([Some(9.0), Some(1.0), Some(1.0), Some(1.0)], 3),
            record([None, Some(1.0), Some(1.0), Some(1.0)], 4),
        ]);

        let (clean_ds, report) = clean(&ds);
        assert_eq!(clean_ds.len(), 4);
        assert_eq!(clean_ds.missing_count(), 0);
        assert_eq!(report.values_filled, 1);
        assert_eq!(report.fill_values, vec![(Attribute::SepalLength, 2.0)]);
        assert_eq!(clean_ds.records[3].get(Attribute::SepalLength), Some(2.0));
    }

    #[test]
    fn test_fill_that_creates_a_copy_is_deduplicated() {
        let ds = Dataset::new(vec![
            record([Some(2.0), Some(1.0), Some(1.0), Some(1.0)], 1),
            record([None, Some(1.0), Some(1.0), Some(1.0)], 1),
        ]);
        let (clean_ds, report) = clean(&ds);
        assert_eq!(clean_ds.len(), 1);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.values_filled, 1);
    }

    #[test]
    fn test_all_missing_column_filled_with_zero() {
        let ds = Dataset::new(vec![
            record([Some(1.0), None, Some(1.0), Some(1.0)], 1),
            record([Some(2.0), None, Some(1.0), Some(1.0)], 2),
        ]);
        let (clean_ds, _) = clean(&ds);
        assert_eq!(clean_ds.missing_count(), 0);
        assert_eq!(clean_ds.column(Attribute::SepalWidth), vec![0.0, 0.0]);
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        let value = prop_oneof![
            3 => (0u8..20).prop_map(|v| Some(v as f64 / 2.0)),
            1 => Just(None::<f64>),
        ];
        let row = (proptest::array::uniform4(value), 1u32..4);
        proptest::collection::vec(row, 0..40).prop_map(|rows| {
            Dataset::new(rows.into_iter().map(|(m, day)| record(m, day)).collect())
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: cleaning twice keeps the row count of cleaning once
        #[test]
        fn prop_clean_is_idempotent(ds in arb_dataset()) {
            let (once, _) = clean(&ds);
            let (twice, report) = clean(&once);
            prop_assert_eq!(once.len(), twice.len());
            prop_assert_eq!(report.duplicates_removed, 0);
            prop_assert_eq!(report.values_filled, 0);
        }

        /// Property: no missing values and no duplicates remain
        #[test]
        fn prop_clean_leaves_no_gaps(ds in arb_dataset()) {
            let (cleaned, _) = clean(&ds);
            prop_assert_eq!(cleaned.missing_count(), 0);
            prop_assert_eq!(count_duplicates(&cleaned), 0);
        }
    }
}
