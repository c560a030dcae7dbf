//! Dataset loading and inspection.

pub mod inspect;
pub mod loader;

pub use inspect::{head, profile};
pub use loader::load_iris;
