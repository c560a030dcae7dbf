//! Grouping by species and derived findings.
//!
//! This module provides utilities for aggregating records per species,
//! the species distribution, daily means for the trend chart, and the
//! textual patterns listed in the report.

use crate::models::{Attribute, AttributeAggregate, Dataset, GroupSummary, Species, SpeciesGroup};
use crate::stats;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Group records by species and aggregate every attribute.
///
/// Groups come out in species order; species without records are skipped.
pub fn group_by_species(dataset: &Dataset) -> GroupSummary {
    let total = dataset.len();

    let groups = Species::ALL
        .iter()
        .filter_map(|species| {
            let count = dataset.records_of(*species).count();
            if count == 0 {
                return None;
            }
            let attributes =
                Attribute::ALL.map(|attr| aggregate(&dataset.column_of(*species, attr)));
            Some(SpeciesGroup {
                species: *species,
                count,
                percentage: percentage(count, total),
                attributes,
            })
        })
        .collect();

    GroupSummary { groups, total }
}

fn aggregate(values: &[f64]) -> AttributeAggregate {
    AttributeAggregate {
        mean: stats::mean(values),
        std: stats::sample_std(values),
        min: stats::min(values),
        max: stats::max(values),
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Species with their counts and share, largest first (ties by species).
pub fn species_distribution(summary: &GroupSummary) -> Vec<(Species, usize, f64)> {
    let mut dist: Vec<_> = summary
        .groups
        .iter()
        .map(|g| (g.species, g.count, g.percentage))
        .collect();
    dist.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    dist
}

/// Mean of an attribute per date, ordered by date.
pub fn daily_means(dataset: &Dataset, attr: Attribute) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

    for record in &dataset.records {
        if let Some(v) = record.get(attr) {
            by_date.entry(record.date).or_default().push(v);
        }
    }

    by_date
        .into_iter()
        .map(|(date, values)| (date, stats::mean(&values)))
        .collect()
}

/// Notable patterns in the grouped data, one sentence each.
pub fn findings(summary: &GroupSummary) -> Vec<String> {
    let mut lines = Vec::new();

    for (species, count, pct) in species_distribution(summary) {
        lines.push(format!("{}: {} observations ({:.1}%)", species, count, pct));
    }

    for species in Species::ALL {
        if let Some(mean) = summary.mean_of(species, Attribute::PetalLength) {
            lines.push(format!("{} mean petal length: {:.2} cm", species, mean));
        }
    }

    if let Some((species, mean)) = summary.max_mean(Attribute::SepalLength) {
        lines.push(format!("Largest mean sepal length: {} ({:.2} cm)", species, mean));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_iris;
    use crate::models::Record;
    use proptest::prelude::*;

    #[test]
    fn test_standard_sample_has_three_equal_groups() {
        let ds = load_iris().unwrap();
        let summary = group_by_species(&ds);

        assert_eq!(summary.groups.len(), 3);
        assert_eq!(summary.total, 150);
        for group in &summary.groups {
            assert_eq!(group.count, 50);
            assert_eq!(format!("{:.1}", group.percentage), "33.3");
        }
    }

    #[test]
    fn test_group_means() {
        let ds = load_iris().unwrap();
        let summary = group_by_species(&ds);

        let expect = [
            (Species::Setosa, 5.006, 1.462),
            (Species::Versicolor, 5.936, 4.26),
            (Species::Virginica, 6.588, 5.552),
        ];
        for (species, sepal, petal) in expect {
            let s = summary.mean_of(species, Attribute::SepalLength).unwrap();
            let p = summary.mean_of(species, Attribute::PetalLength).unwrap();
            assert!((s - sepal).abs() < 1e-9, "{} sepal {}", species, s);
            assert!((p - petal).abs() < 1e-9, "{} petal {}", species, p);
        }

        let (best, mean) = summary.max_mean(Attribute::SepalLength).unwrap();
        assert_eq!(best, Species::Virginica);
        assert!((mean - 6.588).abs() < 1e-9);
    }

    #[test]
    fn test_missing_species_is_skipped() {
        let ds = load_iris().unwrap();
        let only_setosa = Dataset::new(ds.records_of(Species::Setosa).cloned().collect());
        let summary = group_by_species(&only_setosa);
        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].percentage, 100.0);
        assert!(summary.group(Species::Virginica).is_none());
    }

    #[test]
    fn test_species_distribution_sorted_by_count() {
        let ds = load_iris().unwrap();
        let mut records: Vec<Record> = ds.records_of(Species::Setosa).take(5).cloned().collect();
        records.extend(ds.records_of(Species::Virginica).take(10).cloned());
        records.extend(ds.records_of(Species::Versicolor).take(5).cloned());

        let dist = species_distribution(&group_by_species(&Dataset::new(records)));
        assert_eq!(dist[0].0, Species::Virginica);
        assert_eq!(dist[0].1, 10);
        assert_eq!(dist[1].0, Species::Setosa);
        assert_eq!(dist[2].0, Species::Versicolor);
        assert_eq!(dist[0].2, 50.0);
    }

    #[test]
    fn test_daily_means_one_point_per_date() {
        let ds = load_iris().unwrap();
        let daily = daily_means(&ds, Attribute::SepalLength);
        assert_eq!(daily.len(), 150);
        assert_eq!(daily[0].1, 5.1);
        assert!(daily.windows(2).all(|w| w[0].0 < w[1].0));

        let mut shared = ds.clone();
        shared.records[1].date = shared.records[0].date;
        let daily = daily_means(&shared, Attribute::SepalLength);
        assert_eq!(daily.len(), 149);
        assert!((daily[0].1 - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_findings() {
        let ds = load_iris().unwrap();
        let lines = findings(&group_by_species(&ds));
        let has = |text: &str| lines.iter().any(|l| l == text);
        assert!(has("setosa: 50 observations (33.3%)"));
        assert!(has("versicolor mean petal length: 4.26 cm"));
        assert!(has("Largest mean sepal length: virginica (6.59 cm)"));
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        let species = prop_oneof![
            Just(Species::Setosa),
            Just(Species::Versicolor),
            Just(Species::Virginica),
        ];
        proptest::collection::vec((proptest::array::uniform4(0.0f64..10.0), species), 1..60)
            .prop_map(|rows| {
                let date = crate::dataset::loader::start_date();
                Dataset::new(
                    rows.into_iter()
                        .map(|(v, s)| Record::new(v, s, date))
                        .collect(),
                )
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: counts sum to the total and percentages to 100
        #[test]
        fn prop_counts_and_percentages_add_up(ds in arb_dataset()) {
            let summary = group_by_species(&ds);
            let count: usize = summary.groups.iter().map(|g| g.count).sum();
            let pct: f64 = summary.groups.iter().map(|g| g.percentage).sum();
            prop_assert_eq!(count, ds.len());
            prop_assert!((pct - 100.0).abs() < 1e-9);
        }

        /// Property: every group mean lies within the global bounds
        #[test]
        fn prop_group_means_within_global_range(ds in arb_dataset()) {
            let summary = group_by_species(&ds);
            for attr in Attribute::ALL {
                let column = ds.column(attr);
                let (lo, hi) = (stats::min(&column), stats::max(&column));
                for group in &summary.groups {
                    let mean = group.aggregate(attr).mean;
                    prop_assert!(mean >= lo - 1e-9 && mean <= hi + 1e-9);
                }
            }
        }
    }
}
