//! Report output configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FAIL_ON, DEFAULT_FORMATS, DEFAULT_OUT_DIR};

/// Configuration for reporters and the exit-code gate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Output formats. Empty means `json` + `md`.
    pub formats: Vec<String>,
    /// Output directory, relative to the project root unless absolute.
    pub out_dir: Option<String>,
    /// Severity at or above which the scan fails. Default: "CRITICAL".
    pub fail_on: Option<String>,
    /// Baseline file, relative to the project root unless absolute.
    pub baseline: Option<String>,
    /// Honor `shipready-ignore` source comments. Default: false.
    pub inline_suppression: Option<bool>,
}

impl ReportConfig {
    pub fn effective_formats(&self) -> Vec<String> {
        if self.formats.is_empty() {
            DEFAULT_FORMATS.iter().map(|s| s.to_string()).collect()
        } else {
            self.formats.clone()
        }
    }

    pub fn effective_out_dir(&self) -> &str {
        self.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR)
    }

    pub fn effective_fail_on(&self) -> &str {
        self.fail_on.as_deref().unwrap_or(DEFAULT_FAIL_ON)
    }

    pub fn effective_inline_suppression(&self) -> bool {
        self.inline_suppression.unwrap_or(false)
    }
}
