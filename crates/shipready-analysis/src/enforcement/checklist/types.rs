use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enforcement::rules::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShipStatus {
    Ship,
    NoShip,
    NeedsReview,
}

impl ShipStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ship => "ship",
            Self::NoShip => "no-ship",
            Self::NeedsReview => "needs-review",
        }
    }
}

impl fmt::Display for ShipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub category: Category,
    pub label: String,
    pub status: CheckStatus,
    /// Unsuppressed findings at or above the checklist threshold.
    pub open_findings: usize,
}
