//! Pearson correlation between the numeric attributes.

use crate::models::{Attribute, CorrelationMatrix, Dataset};
use crate::stats;

/// Pairwise Pearson coefficients over rows where both values are present.
///
/// The diagonal is always exactly 1.0 and the matrix is symmetric.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let mut values = [[0.0; 4]; 4];

    for a in Attribute::ALL {
        values[a.index()][a.index()] = 1.0;
        for b in Attribute::ALL.iter().copied().filter(|b| *b > a) {
            let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
                .records
                .iter()
                .filter_map(|r| Some((r.get(a)?, r.get(b)?)))
                .unzip();
            let r = stats::pearson(&xs, &ys);
            values[a.index()][b.index()] = r;
            values[b.index()][a.index()] = r;
        }
    }

    CorrelationMatrix { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_iris;
    use crate::models::{Record, Species};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    #[test]
    fn test_standard_sample_correlations() {
        let ds = load_iris().unwrap();
        let m = correlation_matrix(&ds);
        let r = m.get(Attribute::SepalLength, Attribute::PetalLength);
        assert!((r - 0.871754).abs() < 1e-5);
        // petal length and width are almost collinear
        assert!(m.get(Attribute::PetalLength, Attribute::PetalWidth) > 0.95);
        // sepal width runs against petal length
        assert!(m.get(Attribute::SepalWidth, Attribute::PetalLength) < 0.0);
    }

    #[test]
    fn test_constant_column_is_nan_off_diagonal() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let ds = Dataset::new(vec![
            Record::new([1.0, 5.0, 1.0, 2.0], Species::Setosa, date),
            Record::new([2.0, 5.0, 3.0, 1.0], Species::Setosa, date),
            Record::new([3.0, 5.0, 2.0, 0.0], Species::Setosa, date),
        ]);
        let m = correlation_matrix(&ds);
        assert_eq!(m.get(Attribute::SepalWidth, Attribute::SepalWidth), 1.0);
        let flat = m.get(Attribute::SepalLength, Attribute::SepalWidth);
        assert!(flat.is_nan());
        let inverse = m.get(Attribute::SepalLength, Attribute::PetalWidth);
        assert!((inverse + 1.0).abs() < 1e-12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: the matrix is symmetric with a unit diagonal
        #[test]
        fn prop_symmetric_unit_diagonal(
            rows in proptest::collection::vec(proptest::array::uniform4(0.0f64..10.0), 2..30)
        ) {
            let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
            let ds = Dataset::new(
                rows.into_iter()
                    .map(|v| Record::new(v, Species::Virginica, date))
                    .collect(),
            );
            let m = correlation_matrix(&ds);
            for a in Attribute::ALL {
                prop_assert!((m.get(a, a) - 1.0).abs() < 1e-12);
                for b in Attribute::ALL {
                    let (x, y) = (m.get(a, b), m.get(b, a));
                    prop_assert!(x.to_bits() == y.to_bits());
                    prop_assert!(x.is_nan() || (-1.0..=1.0).contains(&x));
                }
            }
        }
    }
}
