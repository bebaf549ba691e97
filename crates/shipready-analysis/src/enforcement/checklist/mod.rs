//! Ship checklist and overall ship status.

pub mod types;

pub use types::{ChecklistItem, CheckStatus, ShipStatus};

use crate::enforcement::rules::{Category, Finding, Severity};

/// Lowest severity that fails a checklist item.
pub const CHECKLIST_THRESHOLD: Severity = Severity::Medium;

/// `no-ship` on any open CRITICAL, else `needs-review` on any open HIGH,
/// else `ship`. Suppressed findings never count.
pub fn compute_status(findings: &[Finding]) -> ShipStatus {
    let worst = findings
        .iter()
        .filter(|f| !f.suppressed)
        .map(|f| f.severity)
        .max();
    match worst {
        Some(Severity::Critical) => ShipStatus::NoShip,
        Some(Severity::High) => ShipStatus::NeedsReview,
        _ => ShipStatus::Ship,
    }
}

/// One item per category, in category order.
pub fn build_checklist(findings: &[Finding]) -> Vec<ChecklistItem> {
    Category::all()
        .iter()
        .map(|&category| {
            let open = findings
                .iter()
                .filter(|f| f.category == category && f.is_open_at(CHECKLIST_THRESHOLD))
                .count();
            ChecklistItem {
                category,
                label: category.label().to_string(),
                status: if open == 0 {
                    CheckStatus::Pass
                } else {
                    CheckStatus::Fail
                },
                open_findings: open,
            }
        })
        .collect()
}
