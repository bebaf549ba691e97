//! Rule trait and the evaluating engine.

use shipready_core::config::ShipreadyConfig;
use shipready_core::tracing::metrics;

use super::types::{Finding, RuleInfo, Severity};
use super::{endpoints, env, queries, rls, ui, wiring};
use crate::graph::AppGraph;

/// Read-only inputs besides the graph.
pub struct RuleContext<'a> {
    pub config: &'a ShipreadyConfig,
}

/// A single rule over the app graph. Rules abstain on missing data.
pub trait Rule: Send + Sync {
    fn info(&self) -> &RuleInfo;

    fn evaluate(&self, graph: &AppGraph, ctx: &RuleContext<'_>) -> Vec<Finding>;

    fn code(&self) -> &'static str {
        self.info().code
    }
}

/// Every built-in rule in registry order.
pub fn create_all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(env::EnvNotDeclared),
        Box::new(queries::QueryNoPagination),
        Box::new(queries::QuerySelectStar),
        Box::new(queries::MutationWithoutFilter),
        Box::new(rls::TableWithoutRls),
        Box::new(rls::RlsWithoutPolicy),
        Box::new(queries::QueryUnknownTable),
        Box::new(wiring::ApiCallNoRoute),
        Box::new(wiring::NavToMissingRoute),
        Box::new(endpoints::EndpointNoAuth),
        Box::new(endpoints::EndpointNoErrorHandling),
        Box::new(endpoints::EndpointNoValidation),
        Box::new(ui::UiStubAction),
    ]
}

/// Runs rules in order and concatenates their findings.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rules: create_all_rules(),
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.code()).collect()
    }

    /// Evaluate every enabled rule. Configured severity overrides are applied
    /// to the produced findings.
    pub fn evaluate(&self, graph: &AppGraph, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let rules_config = &ctx.config.rules;
        let mut findings = Vec::new();

        for rule in &self.rules {
            let code = rule.code();
            if rules_config.is_disabled(code) {
                tracing::debug!(rule = code, "rule disabled");
                continue;
            }
            let override_severity = rules_config
                .severity_overrides
                .iter()
                .find(|(c, _)| c.eq_ignore_ascii_case(code))
                .and_then(|(_, s)| Severity::parse(s));

            let produced = rule.evaluate(graph, ctx);
            tracing::debug!(rule = code, findings = produced.len(), "rule evaluated");
            findings.extend(produced.into_iter().map(|f| match override_severity {
                Some(severity) => f.with_severity(severity),
                None => f,
            }));
        }

        tracing::info!({ metrics::FINDINGS_EMITTED } = findings.len(), "rules evaluated");
        findings
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
