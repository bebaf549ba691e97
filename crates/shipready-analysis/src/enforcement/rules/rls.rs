//! Row-level security coverage from migrations.

use std::collections::BTreeMap;

use super::engine::{Rule, RuleContext};
use super::types::{Category, Confidence, EvidenceRef, Finding, RuleInfo, Severity};
use crate::graph::{AppGraph, StatementKind};

/// Per-table RLS state after replaying every migration in path order.
#[derive(Debug, Default)]
struct TableState {
    created_at: Option<(String, u32)>,
    /// Last enable/disable statement: (enabled, file, line).
    rls: Option<(bool, String, u32)>,
    has_policy: bool,
}

fn replay(graph: &AppGraph) -> BTreeMap<String, TableState> {
    let mut migrations: Vec<_> = graph.migrations().collect();
    migrations.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    let mut tables: BTreeMap<String, TableState> = BTreeMap::new();
    for migration in migrations {
        for statement in &migration.statements {
            let state = tables.entry(statement.table.clone()).or_default();
            let at = (migration.file_path.clone(), statement.line);
            match statement.kind {
                StatementKind::CreateTable => {
                    if state.created_at.is_none() {
                        state.created_at = Some(at);
                    }
                }
                StatementKind::EnableRls => state.rls = Some((true, at.0, at.1)),
                StatementKind::DisableRls => state.rls = Some((false, at.0, at.1)),
                StatementKind::CreatePolicy => state.has_policy = true,
            }
        }
    }
    tables
}

pub struct TableWithoutRls;

const TABLE_WITHOUT_RLS: RuleInfo = RuleInfo {
    code: "TABLE_WITHOUT_RLS",
    category: Category::Security,
    severity: Severity::Critical,
    confidence: Confidence::Medium,
    title: "Table without row-level security",
    fix_summary: "Enable row-level security on the table and add policies.",
    fix_steps: &[
        "ALTER TABLE <name> ENABLE ROW LEVEL SECURITY;",
        "CREATE POLICY ... ON <name> for each access pattern",
    ],
};

impl Rule for TableWithoutRls {
    fn info(&self) -> &RuleInfo {
        &TABLE_WITHOUT_RLS
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        replay(graph)
            .into_iter()
            .filter_map(|(table, state)| {
                let (file, line) = state.created_at?;
                let reason = match state.rls {
                    Some((true, _, _)) => return None,
                    Some((false, _, _)) => "row-level security disabled by a later migration",
                    None => "row-level security never enabled",
                };
                Finding::new(
                    &TABLE_WITHOUT_RLS,
                    format!("Table `{table}` is exposed without row-level security."),
                    vec![EvidenceRef::at(file, line).with_reason(reason)],
                )
                .map(|f| f.with_related(vec![table]))
            })
            .collect()
    }
}

pub struct RlsWithoutPolicy;

const RLS_WITHOUT_POLICY: RuleInfo = RuleInfo {
    code: "RLS_WITHOUT_POLICY",
    category: Category::Security,
    severity: Severity::Medium,
    confidence: Confidence::Medium,
    title: "Row-level security enabled without policies",
    fix_summary: "Add policies, otherwise every non-service query is denied.",
    fix_steps: &["CREATE POLICY ... ON <name> for select/insert/update/delete as needed"],
};

impl Rule for RlsWithoutPolicy {
    fn info(&self) -> &RuleInfo {
        &RLS_WITHOUT_POLICY
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        replay(graph)
            .into_iter()
            .filter_map(|(table, state)| {
                let (enabled, file, line) = state.rls?;
                if !enabled || state.has_policy {
                    return None;
                }
                Finding::new(
                    &RLS_WITHOUT_POLICY,
                    format!("Table `{table}` has row-level security but no policy."),
                    vec![EvidenceRef::at(file, line).with_reason("no CREATE POLICY for this table")],
                )
                .map(|f| f.with_related(vec![table]))
            })
            .collect()
    }
}
