//! Undeclared environment variables.

use std::collections::BTreeMap;

use super::engine::{Rule, RuleContext};
use super::types::{Category, Confidence, EvidenceRef, Finding, RuleInfo, Severity};
use crate::graph::{AppGraph, EnvVarNode};

pub struct EnvNotDeclared;

const ENV_NOT_DECLARED: RuleInfo = RuleInfo {
    code: "ENV_NOT_DECLARED",
    category: Category::Config,
    severity: Severity::Medium,
    confidence: Confidence::Low,
    title: "Environment variable not declared in the example env file",
    fix_summary: "Declare the variable in .env.example so deployments know to set it.",
    fix_steps: &[
        "Add `NAME=` with a placeholder value to .env.example",
        "Set the variable in every deployment environment",
    ],
};

impl Rule for EnvNotDeclared {
    fn info(&self) -> &RuleInfo {
        &ENV_NOT_DECLARED
    }

    fn evaluate(&self, graph: &AppGraph, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let env = &ctx.config.env;
        let mut by_name: BTreeMap<&str, Vec<&EnvVarNode>> = BTreeMap::new();
        for var in graph.env_vars() {
            if var.in_example || env.is_public(&var.name) || env.is_ignored(&var.name) {
                continue;
            }
            by_name.entry(var.name.as_str()).or_default().push(var);
        }

        by_name
            .into_iter()
            .filter_map(|(name, mut accesses)| {
                accesses.sort_by(|a, b| (&a.file_path, a.line).cmp(&(&b.file_path, b.line)));
                let defaulted = accesses.iter().all(|a| a.has_default);
                let evidence = accesses
                    .iter()
                    .map(|a| {
                        let ev = EvidenceRef::at(a.file_path.clone(), a.line);
                        if a.has_default {
                            ev.with_reason("read with a fallback value")
                        } else {
                            ev.with_reason(format!("reads {name}"))
                        }
                    })
                    .collect();
                let description = if defaulted {
                    format!("`{name}` is read in code but missing from the example env file; every read has a fallback.")
                } else {
                    format!("`{name}` is read in code but missing from the example env file.")
                };
                Finding::new(&ENV_NOT_DECLARED, description, evidence)
                    .map(|f| f.with_related(vec![name.to_string()]))
            })
            .collect()
    }
}
