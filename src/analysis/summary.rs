//! Descriptive statistics per numeric column.

use crate::models::{Attribute, ColumnStats, Dataset};
use crate::stats;

/// Compute descriptive statistics for every attribute, in column order.
pub fn describe(dataset: &Dataset) -> Vec<ColumnStats> {
    Attribute::ALL
        .iter()
        .map(|attr| column_stats(*attr, &dataset.column(*attr)))
        .collect()
}

/// Descriptive statistics of one column's values.
pub fn column_stats(attribute: Attribute, values: &[f64]) -> ColumnStats {
    ColumnStats {
        attribute,
        count: values.len(),
        mean: stats::mean(values),
        std: stats::sample_std(values),
        min: stats::min(values),
        q1: stats::quantile(values, 0.25),
        median: stats::median(values),
        q3: stats::quantile(values, 0.75),
        max: stats::max(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_iris;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_describe_standard_sample() {
        let ds = load_iris().unwrap();
        let summary = describe(&ds);
        assert_eq!(summary.len(), 4);

        let sepal = &summary[0];
        assert_eq!(sepal.attribute, Attribute::SepalLength);
        assert_eq!(sepal.count, 150);
        assert!(close(sepal.mean, 5.843333));
        assert!(close(sepal.std, 0.828066));
        assert!(close(sepal.min, 4.3));
        assert!(close(sepal.q1, 5.1));
        assert!(close(sepal.median, 5.8));
        assert!(close(sepal.q3, 6.4));
        assert!(close(sepal.max, 7.9));

        let petal = &summary[2];
        assert!(close(petal.mean, 3.758));
        assert!(close(petal.median, 4.35));
        assert!(close(petal.q1, 1.6));
        assert!(close(petal.q3, 5.1));
    }

    #[test]
    fn test_stats_are_ordered() {
        let ds = load_iris().unwrap();
        for s in describe(&ds) {
            assert!(s.min <= s.q1);
            assert!(s.q1 <= s.median);
            assert!(s.median <= s.q3);
            assert!(s.q3 <= s.max);
            assert!(s.min <= s.mean && s.mean <= s.max);
        }
    }

    #[test]
    fn test_empty_column() {
        let s = column_stats(Attribute::PetalWidth, &[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
    }
}
