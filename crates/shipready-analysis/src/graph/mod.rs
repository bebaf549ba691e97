//! App graph — typed node store populated by extractors, read by rules.

pub mod app_graph;
pub mod normalize;
pub mod types;

pub use app_graph::AppGraph;
pub use normalize::{normalize_target_path, route_matches, RouteIndex};
pub use types::*;
