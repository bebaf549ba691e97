//! File indexing and parsing configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXCLUDE_DIRS, DEFAULT_INCLUDE_GLOBS, DEFAULT_MAX_ERROR_RATIO, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_THREADS, SELF_EXCLUDE_PATHS,
};

/// Configuration for the file indexer and source project.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Include globs. Empty means the built-in code + migration globs.
    pub include: Vec<String>,
    /// Directory names never descended into. Empty means the built-in list.
    pub exclude_dirs: Vec<String>,
    /// Extra relative path prefixes to exclude, added to the built-in ones.
    pub exclude_paths: Vec<String>,
    /// Honor `.gitignore` files. Default: true.
    pub respect_gitignore: Option<bool>,
    /// Maximum file size in bytes. Default: 1MB.
    pub max_file_size: Option<u64>,
    /// Parse threads (0 = auto). Default: 0.
    pub threads: Option<usize>,
    /// Tolerated ERROR-node ratio; 0 skips any file with a syntax error. Default: 0.
    pub max_error_ratio: Option<f64>,
    /// Read the target's `tsconfig.json`. Default: true.
    pub use_tsconfig: Option<bool>,
}

impl ScanConfig {
    pub fn effective_include(&self) -> Vec<String> {
        if self.include.is_empty() {
            DEFAULT_INCLUDE_GLOBS.iter().map(|s| s.to_string()).collect()
        } else {
            self.include.clone()
        }
    }

    pub fn effective_exclude_dirs(&self) -> Vec<String> {
        if self.exclude_dirs.is_empty() {
            DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect()
        } else {
            self.exclude_dirs.clone()
        }
    }

    /// Built-in self-exclusions followed by the configured extra paths.
    pub fn effective_exclude_paths(&self) -> Vec<String> {
        SELF_EXCLUDE_PATHS
            .iter()
            .map(|s| s.to_string())
            .chain(self.exclude_paths.iter().cloned())
            .collect()
    }

    pub fn effective_respect_gitignore(&self) -> bool {
        self.respect_gitignore.unwrap_or(true)
    }

    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }

    pub fn effective_max_error_ratio(&self) -> f64 {
        self.max_error_ratio.unwrap_or(DEFAULT_MAX_ERROR_RATIO)
    }

    pub fn effective_use_tsconfig(&self) -> bool {
        self.use_tsconfig.unwrap_or(true)
    }
}
