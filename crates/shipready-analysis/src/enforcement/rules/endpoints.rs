//! Endpoint hygiene: auth, error handling, input validation.

use super::engine::{Rule, RuleContext};
use super::types::{Category, Confidence, EvidenceRef, Finding, RuleInfo, Severity};
use crate::graph::{AppGraph, EndpointNode, HandlerKind};

fn describe(endpoint: &EndpointNode) -> String {
    let methods = if endpoint.methods.is_empty() {
        "ANY".to_string()
    } else {
        endpoint
            .methods
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join("|")
    };
    match (&endpoint.handler_kind, &endpoint.route_path) {
        (HandlerKind::ServerAction, _) => format!("Server action `{}`", endpoint.name),
        (_, Some(path)) => format!("{methods} {path}"),
        (_, None) => format!("{methods} handler `{}`", endpoint.name),
    }
}

fn evidence(endpoint: &EndpointNode, reason: &str) -> Vec<EvidenceRef> {
    vec![EvidenceRef::at(endpoint.file_path.clone(), endpoint.line).with_reason(reason)]
}

pub struct EndpointNoAuth;

const ENDPOINT_NO_AUTH: RuleInfo = RuleInfo {
    code: "ENDPOINT_NO_AUTH",
    category: Category::Security,
    severity: Severity::High,
    confidence: Confidence::Low,
    title: "Mutating endpoint without an auth check",
    fix_summary: "Verify the caller's session before changing data.",
    fix_steps: &[
        "Call the auth helper (auth(), getServerSession(), supabase.auth.getUser()) first",
        "Return 401 when no user is present",
    ],
};

impl Rule for EndpointNoAuth {
    fn info(&self) -> &RuleInfo {
        &ENDPOINT_NO_AUTH
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        graph
            .endpoints()
            .filter(|e| e.is_mutating() && !e.has_auth_check)
            .filter_map(|e| {
                Finding::new(
                    &ENDPOINT_NO_AUTH,
                    format!("{} changes state without checking who is calling.", describe(e)),
                    evidence(e, "no auth call found in the handler"),
                )
            })
            .collect()
    }
}

pub struct EndpointNoErrorHandling;

const ENDPOINT_NO_ERROR_HANDLING: RuleInfo = RuleInfo {
    code: "ENDPOINT_NO_ERROR_HANDLING",
    category: Category::Reliability,
    severity: Severity::Medium,
    confidence: Confidence::Low,
    title: "Endpoint without error handling",
    fix_summary: "Wrap the handler body in try/catch and return a controlled error.",
    fix_steps: &[
        "Catch failures from database and network calls",
        "Log the error and respond with a 4xx/5xx payload",
    ],
};

impl Rule for EndpointNoErrorHandling {
    fn info(&self) -> &RuleInfo {
        &ENDPOINT_NO_ERROR_HANDLING
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        graph
            .endpoints()
            .filter(|e| !e.has_error_handling)
            .filter_map(|e| {
                Finding::new(
                    &ENDPOINT_NO_ERROR_HANDLING,
                    format!("{} has no try/catch.", describe(e)),
                    evidence(e, "no try statement in the handler"),
                )
            })
            .collect()
    }
}

pub struct EndpointNoValidation;

const ENDPOINT_NO_VALIDATION: RuleInfo = RuleInfo {
    code: "ENDPOINT_NO_VALIDATION",
    category: Category::Security,
    severity: Severity::Medium,
    confidence: Confidence::Low,
    title: "Request body used without validation",
    fix_summary: "Validate input with a schema before using it.",
    fix_steps: &[
        "Define a schema (e.g. zod) for the expected body",
        "Use schema.safeParse(body) and reject invalid input",
    ],
};

impl Rule for EndpointNoValidation {
    fn info(&self) -> &RuleInfo {
        &ENDPOINT_NO_VALIDATION
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        graph
            .endpoints()
            .filter(|e| e.reads_body && !e.has_input_validation)
            .filter_map(|e| {
                Finding::new(
                    &ENDPOINT_NO_VALIDATION,
                    format!("{} reads input without validating it.", describe(e)),
                    evidence(e, "body read with no parse/validate call"),
                )
            })
            .collect()
    }
}
