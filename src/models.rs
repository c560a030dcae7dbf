//! Data models for the analysis pipeline.
//!
//! This module contains the core data structures passed between the
//! loading, cleaning, summarizing, aggregating, and rendering stages.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Species label of a sample.
///
/// Ordered alphabetically by label, which is the order groups are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Iris setosa
    Setosa,
    /// Iris versicolor
    Versicolor,
    /// Iris virginica
    Virginica,
}

impl Species {
    /// All species in reporting order.
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    /// Returns the lowercase label used in the dataset.
    pub fn label(&self) -> &'static str {
        match self {
            Species::Setosa => "setosa",
            Species::Versicolor => "versicolor",
            Species::Virginica => "virginica",
        }
    }

    /// Position of the species in [`Species::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Species::Setosa => 0,
            Species::Versicolor => 1,
            Species::Virginica => 2,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "setosa" | "iris-setosa" => Ok(Species::Setosa),
            "versicolor" | "iris-versicolor" => Ok(Species::Versicolor),
            "virginica" | "iris-virginica" => Ok(Species::Virginica),
            other => Err(format!("unknown species '{}'", other)),
        }
    }
}

/// One of the four numeric measurement columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl Attribute {
    /// All attributes in column order.
    pub const ALL: [Attribute; 4] = [
        Attribute::SepalLength,
        Attribute::SepalWidth,
        Attribute::PetalLength,
        Attribute::PetalWidth,
    ];

    /// Position of the attribute in a record's measurement array.
    pub fn index(&self) -> usize {
        match self {
            Attribute::SepalLength => 0,
            Attribute::SepalWidth => 1,
            Attribute::PetalLength => 2,
            Attribute::PetalWidth => 3,
        }
    }

    /// Column name including the unit.
    pub fn column_name(&self) -> &'static str {
        match self {
            Attribute::SepalLength => "sepal length (cm)",
            Attribute::SepalWidth => "sepal width (cm)",
            Attribute::PetalLength => "petal length (cm)",
            Attribute::PetalWidth => "petal width (cm)",
        }
    }

    /// Short title for chart axes and headings.
    pub fn title(&self) -> &'static str {
        match self {
            Attribute::SepalLength => "Sepal Length",
            Attribute::SepalWidth => "Sepal Width",
            Attribute::PetalLength => "Petal Length",
            Attribute::PetalWidth => "Petal Width",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// One measured sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Measurements indexed by [`Attribute::index`]. `None` marks a missing value.
    pub measurements: [Option<f64>; 4],
    /// Species label.
    pub species: Species,
    /// Synthetic observation date.
    pub date: NaiveDate,
}

impl Record {
    /// Creates a record with every measurement present.
    #[cfg(test)]
    pub fn new(values: [f64; 4], species: Species, date: NaiveDate) -> Self {
        Self {
            measurements: values.map(Some),
            species,
            date,
        }
    }

    /// Returns the value of an attribute, if present.
    pub fn get(&self, attr: Attribute) -> Option<f64> {
        self.measurements[attr.index()]
    }

    /// Returns true when any measurement is missing.
    pub fn has_missing(&self) -> bool {
        self.measurements.iter().any(Option::is_none)
    }

    /// Returns true when `other` is an exact duplicate of this record.
    ///
    /// Measurements are compared bit-for-bit so that two missing values match.
    pub fn same_as(&self, other: &Record) -> bool {
        self.species == other.species
            && self.date == other.date
            && self
                .measurements
                .iter()
                .zip(other.measurements.iter())
                .all(|(a, b)| a.map(f64::to_bits) == b.map(f64::to_bits))
    }
}

/// An ordered sequence of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset from records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Present values of one attribute, in record order.
    pub fn column(&self, attr: Attribute) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.get(attr)).collect()
    }

    /// Number of missing values of one attribute.
    pub fn missing_in(&self, attr: Attribute) -> usize {
        self.records.iter().filter(|r| r.get(attr).is_none()).count()
    }

    /// Total number of missing numeric values.
    pub fn missing_count(&self) -> usize {
        Attribute::ALL.iter().map(|a| self.missing_in(*a)).sum()
    }

    /// Records belonging to one species.
    pub fn records_of(&self, species: Species) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.species == species)
    }

    /// Present values of one attribute restricted to a species.
    pub fn column_of(&self, species: Species, attr: Attribute) -> Vec<f64> {
        self.records_of(species).filter_map(|r| r.get(attr)).collect()
    }
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub attribute: Attribute,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    pub max: f64,
}

/// Aggregate of one attribute within a species group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeAggregate {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-species aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesGroup {
    pub species: Species,
    pub count: usize,
    /// Share of all records, in percent.
    pub percentage: f64,
    /// One aggregate per attribute, indexed by [`Attribute::index`].
    pub attributes: [AttributeAggregate; 4],
}

impl SpeciesGroup {
    /// Aggregate for one attribute.
    pub fn aggregate(&self, attr: Attribute) -> &AttributeAggregate {
        &self.attributes[attr.index()]
    }
}

/// Summary of the dataset grouped by species.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Groups in species order. Species with no records are absent.
    pub groups: Vec<SpeciesGroup>,
    /// Total number of records across all groups.
    pub total: usize,
}

impl GroupSummary {
    /// Looks up the group of a species.
    pub fn group(&self, species: Species) -> Option<&SpeciesGroup> {
        self.groups.iter().find(|g| g.species == species)
    }

    /// Mean of an attribute within a species group.
    pub fn mean_of(&self, species: Species, attr: Attribute) -> Option<f64> {
        self.group(species).map(|g| g.aggregate(attr).mean)
    }

    /// Species with the largest mean of `attr`, with that mean.
    ///
    /// Ties go to the first species in alphabetical order.
    pub fn max_mean(&self, attr: Attribute) -> Option<(Species, f64)> {
        let mut best: Option<(Species, f64)> = None;
        for group in &self.groups {
            let mean = group.aggregate(attr).mean;
            match best {
                Some((_, current)) if mean <= current => {}
                _ => best = Some((group.species, mean)),
            }
        }
        best
    }
}

/// Pearson correlation coefficients between all attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Row-major coefficients, indexed by [`Attribute::index`].
    pub values: [[f64; 4]; 4],
}

impl CorrelationMatrix {
    /// Coefficient between two attributes.
    pub fn get(&self, a: Attribute, b: Attribute) -> f64 {
        self.values[a.index()][b.index()]
    }
}

/// Kind of chart written by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Four-panel dashboard (trend, bars, histogram, scatter).
    Dashboard,
    /// Correlation heatmap.
    Heatmap,
    /// Per-attribute boxplots grouped by species.
    Boxplots,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Dashboard => write!(f, "Dashboard"),
            ChartKind::Heatmap => write!(f, "Correlation heatmap"),
            ChartKind::Boxplots => write!(f, "Boxplots"),
        }
    }
}

/// A chart image written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub path: PathBuf,
}

/// Outcome of the cleaning stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Number of exact duplicates removed.
    pub duplicates_removed: usize,
    /// Number of missing values replaced.
    pub values_filled: usize,
    /// Median used per attribute, only for attributes that had gaps.
    pub fill_values: Vec<(Attribute, f64)>,
}

/// Structural profile of a dataset before cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    /// Column name and type name, in column order.
    pub column_types: Vec<(String, String)>,
    /// Missing values per column, in column order.
    pub missing_by_column: Vec<(String, usize)>,
    pub total_missing: usize,
    pub duplicate_rows: usize,
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Date and time of the run.
    pub analysis_date: DateTime<Utc>,
    /// Rows loaded before cleaning.
    pub rows_loaded: usize,
    /// Rows left after cleaning.
    pub rows_clean: usize,
    /// Charts written by this run.
    pub charts: Vec<ChartArtifact>,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub profile: DatasetProfile,
    pub cleaning: CleaningReport,
    pub statistics: Vec<ColumnStats>,
    pub groups: GroupSummary,
    pub correlation: CorrelationMatrix,
    /// Notable patterns, one sentence each.
    pub findings: Vec<String>,
}
