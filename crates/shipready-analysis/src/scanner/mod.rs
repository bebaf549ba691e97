//! File indexer — walks the project tree and produces a flat catalog.
//!
//! The catalog is the entry point of the pipeline: every later phase reads
//! file paths from it and never walks the filesystem again.

pub mod indexer;
pub mod types;

pub use indexer::FileIndexer;
pub use types::{FileCatalog, FileEntry};
