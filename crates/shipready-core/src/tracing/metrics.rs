//! Structured field names used in tracing events across the pipeline.
//!
//! Consistent names keep log queries stable between releases.

/// Indexer: number of catalogued files.
pub const FILES_INDEXED: &str = "files_indexed";

/// Indexer: number of SQL migration files.
pub const MIGRATION_FILES: &str = "migration_files";

/// Project: files parsed into syntax trees.
pub const FILES_PARSED: &str = "files_parsed";

/// Project: files skipped because they could not be parsed.
pub const FILES_SKIPPED: &str = "files_skipped";

/// Extractors: nodes appended by a single extractor.
pub const NODES_ADDED: &str = "nodes_added";

/// Rules: findings emitted by a single rule.
pub const FINDINGS_EMITTED: &str = "findings_emitted";

/// Baseline: findings marked suppressed.
pub const FINDINGS_SUPPRESSED: &str = "findings_suppressed";

/// Pipeline: phase duration in milliseconds.
pub const PHASE_DURATION_MS: &str = "phase_duration_ms";
