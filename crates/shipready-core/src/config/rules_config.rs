//! Rule engine configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration for the rule registry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule codes that are not evaluated.
    pub disabled: Vec<String>,
    /// Rule code → severity (`CRITICAL`, `HIGH`, `MEDIUM`, `LOW`).
    pub severity_overrides: BTreeMap<String, String>,
}

impl RulesConfig {
    pub fn is_disabled(&self, code: &str) -> bool {
        self.disabled.iter().any(|c| c.eq_ignore_ascii_case(code))
    }
}
