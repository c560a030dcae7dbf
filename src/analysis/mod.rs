//! Analysis stages.
//!
//! Cleaning, descriptive statistics, grouping and correlation. Each stage is
//! a pure function of the dataset it receives.

pub mod aggregator;
pub mod cleaner;
pub mod correlation;
pub mod summary;

pub use aggregator::*;
pub use cleaner::{clean, count_duplicates};
pub use correlation::correlation_matrix;
pub use summary::describe;
