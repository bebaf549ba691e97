//! Enforcement — rules, baseline suppression, ship checklist, reporters.

pub mod baseline;
pub mod checklist;
pub mod context;
pub mod reporters;
pub mod rules;

pub use context::{RouteEntry, ScanStats, ValidationContext};
