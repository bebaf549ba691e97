//! Baseline file shape and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shipready_core::errors::BaselineError;

/// A team-curated list of accepted findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationBaseline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default)]
    pub suppress: Vec<BaselineEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineEntry {
    pub rule_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_id: Option<String>,
}

impl BaselineEntry {
    pub fn rule(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            file_path: None,
            line: None,
            gap_id: None,
        }
    }
}

impl ValidationBaseline {
    /// Read and validate a baseline file.
    pub fn load(path: &Path) -> Result<ValidationBaseline, BaselineError> {
        let content = std::fs::read_to_string(path).map_err(|e| BaselineError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let baseline = Self::parse(&content).map_err(|e| match e {
            BaselineError::ParseError { message, .. } => BaselineError::ParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), entries = baseline.suppress.len(), "loaded baseline");
        Ok(baseline)
    }

    /// Parse baseline JSON. Entries must name a rule.
    pub fn parse(content: &str) -> Result<ValidationBaseline, BaselineError> {
        let baseline: ValidationBaseline =
            serde_json::from_str(content).map_err(|e| BaselineError::ParseError {
                path: "<string>".to_string(),
                message: e.to_string(),
            })?;
        for (index, entry) in baseline.suppress.iter().enumerate() {
            if entry.rule_id.trim().is_empty() {
                return Err(BaselineError::InvalidEntry {
                    index,
                    message: "ruleId must not be empty".to_string(),
                });
            }
        }
        Ok(baseline)
    }

    pub fn is_empty(&self) -> bool {
        self.suppress.is_empty()
    }
}
