//! Environment-variable extraction configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{AMBIENT_ENV_VARS, ENV_EXAMPLE_FILES, PUBLIC_ENV_PREFIXES};

/// Configuration for env var cross-referencing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EnvConfig {
    /// Prefixes treated as public-safe. Empty means the built-in list.
    pub public_prefixes: Vec<String>,
    /// Variable names never reported, added to the built-in ambient list.
    pub ignore: Vec<String>,
    /// Declaration file candidates. Empty means the built-in list.
    pub example_files: Vec<String>,
}

impl EnvConfig {
    pub fn effective_public_prefixes(&self) -> Vec<String> {
        if self.public_prefixes.is_empty() {
            PUBLIC_ENV_PREFIXES.iter().map(|s| s.to_string()).collect()
        } else {
            self.public_prefixes.clone()
        }
    }

    pub fn effective_ignore(&self) -> Vec<String> {
        AMBIENT_ENV_VARS
            .iter()
            .map(|s| s.to_string())
            .chain(self.ignore.iter().cloned())
            .collect()
    }

    pub fn effective_example_files(&self) -> Vec<String> {
        if self.example_files.is_empty() {
            ENV_EXAMPLE_FILES.iter().map(|s| s.to_string()).collect()
        } else {
            self.example_files.clone()
        }
    }

    /// Whether `name` carries a public-safe prefix.
    pub fn is_public(&self, name: &str) -> bool {
        self.effective_public_prefixes()
            .iter()
            .any(|p| name.starts_with(p.as_str()))
    }

    /// Whether `name` is ambient or explicitly ignored.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.effective_ignore().iter().any(|n| n == name)
    }
}
