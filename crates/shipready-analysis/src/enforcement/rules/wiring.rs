//! Callsites that point at routes the project does not define.

use super::engine::{Rule, RuleContext};
use super::types::{Category, Confidence, EvidenceRef, Finding, RuleInfo, Severity};
use crate::graph::{normalize_target_path, AppGraph, CallKind, RouteIndex};

fn is_api_target(normalized: &str) -> bool {
    normalized == "/api" || normalized.starts_with("/api/")
}

pub struct ApiCallNoRoute;

const API_CALL_NO_ROUTE: RuleInfo = RuleInfo {
    code: "API_CALL_NO_ROUTE",
    category: Category::Wiring,
    severity: Severity::High,
    confidence: Confidence::Medium,
    title: "API call to a route that does not exist",
    fix_summary: "Create the API route or point the call at an existing one.",
    fix_steps: &[
        "Add app/api/.../route.ts (or pages/api/...) for the path",
        "Or correct the path in the call",
    ],
};

impl Rule for ApiCallNoRoute {
    fn info(&self) -> &RuleInfo {
        &API_CALL_NO_ROUTE
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        let index = RouteIndex::from_graph(graph);
        graph
            .callsites()
            .filter(|c| matches!(c.call_kind, CallKind::Fetch | CallKind::Axios))
            .filter(|c| is_api_target(&normalize_target_path(&c.target_path)))
            .filter(|c| !index.matches_api(&c.target_path))
            .filter_map(|c| {
                let method = c.http_method.map(|m| format!("{m} ")).unwrap_or_default();
                Finding::new(
                    &API_CALL_NO_ROUTE,
                    format!("{method}{} has no matching API route.", c.target_path),
                    vec![EvidenceRef::at(c.file_path.clone(), c.line)
                        .with_reason(format!("{} call to {}", c.call_kind.name(), c.target_path))],
                )
                .map(|f| f.with_related(vec![c.target_path.clone()]))
            })
            .collect()
    }
}

pub struct NavToMissingRoute;

const NAV_TO_MISSING_ROUTE: RuleInfo = RuleInfo {
    code: "NAV_TO_MISSING_ROUTE",
    category: Category::Wiring,
    severity: Severity::Medium,
    confidence: Confidence::Medium,
    title: "Navigation to a page that does not exist",
    fix_summary: "Create the page or fix the navigation target.",
    fix_steps: &["Add app/.../page.tsx (or pages/...) for the path, or correct the target"],
};

impl Rule for NavToMissingRoute {
    fn info(&self) -> &RuleInfo {
        &NAV_TO_MISSING_ROUTE
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        let index = RouteIndex::from_graph(graph);
        if !index.has_page_routes() {
            return Vec::new();
        }
        graph
            .callsites()
            .filter(|c| c.call_kind == CallKind::Router)
            .filter(|c| c.target_path.starts_with('/') && !c.target_path.starts_with("//"))
            .filter(|c| !index.matches_page(&c.target_path))
            .filter_map(|c| {
                Finding::new(
                    &NAV_TO_MISSING_ROUTE,
                    format!("Navigation to {} matches no page route.", c.target_path),
                    vec![EvidenceRef::at(c.file_path.clone(), c.line)
                        .with_reason(format!("router navigation to {}", c.target_path))],
                )
                .map(|f| f.with_related(vec![c.target_path.clone()]))
            })
            .collect()
    }
}
