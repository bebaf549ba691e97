//! shipready analysis engine.
//!
//! Pipeline: `scanner` (file catalog) → `project` (syntax trees) →
//! `extractors` (populate the `graph`) → `enforcement::rules` (findings) →
//! `enforcement::baseline` (suppression) → `enforcement::checklist`
//! (ship status) → `enforcement::reporters`.

pub mod enforcement;
pub mod extractors;
pub mod graph;
pub mod pipeline;
pub mod project;
pub mod scanner;

pub use pipeline::{ScanOptions, ScanOutcome, ScanPipeline};
