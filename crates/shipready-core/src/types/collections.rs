//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec sized for HTTP methods on a single handler (usually 1-2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
