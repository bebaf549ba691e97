//! Stubbed UI actions.

use super::engine::{Rule, RuleContext};
use super::types::{Category, Confidence, EvidenceRef, Finding, RuleInfo, Severity};
use crate::graph::{AppGraph, UiActionNode};

pub struct UiStubAction;

const UI_STUB_ACTION: RuleInfo = RuleInfo {
    code: "UI_STUB_ACTION",
    category: Category::Ui,
    severity: Severity::Medium,
    confidence: Confidence::High,
    title: "UI control wired to a stub",
    fix_summary: "Connect the control to a real action or remove it.",
    fix_steps: &[
        "Implement the handler or call the relevant API/server action",
        "Remove placeholder TODOs, console-only handlers and '#' links",
    ],
};

/// Severity, confidence and reason for the strongest stub signal.
fn grade(action: &UiActionNode) -> Option<(Severity, Confidence, &'static str)> {
    if action.todo_marker {
        Some((Severity::Medium, Confidence::High, "handler contains TODO/FIXME"))
    } else if action.empty_handler {
        Some((Severity::Medium, Confidence::High, "handler body is empty"))
    } else if action.console_only {
        Some((Severity::Medium, Confidence::Medium, "handler only logs or shows a toast"))
    } else if action.placeholder_href {
        Some((Severity::Low, Confidence::Medium, "link points at '#' or nowhere"))
    } else {
        None
    }
}

impl Rule for UiStubAction {
    fn info(&self) -> &RuleInfo {
        &UI_STUB_ACTION
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        graph
            .ui_actions()
            .filter_map(|action| {
                let (severity, confidence, reason) = grade(action)?;
                let handler = action.handler.as_deref().unwrap_or("handler");
                Finding::new(
                    &UI_STUB_ACTION,
                    format!("<{}> {} is a stub: {}.", action.tag, handler, reason),
                    vec![EvidenceRef::at(action.file_path.clone(), action.line)
                        .with_snippet(action.snippet.clone())
                        .with_reason(reason)],
                )
                .map(|f| f.with_severity(severity).with_confidence(confidence))
            })
            .collect()
    }
}
