//! Accepted-gaps baseline and inline suppression comments.

pub mod inline;
pub mod matcher;
pub mod types;

pub use inline::InlineSuppressor;
pub use matcher::BaselineMatcher;
pub use types::{BaselineEntry, ValidationBaseline};
