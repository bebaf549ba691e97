//! Supabase query rules.

use rustc_hash::FxHashSet;

use super::engine::{Rule, RuleContext};
use super::types::{Category, Confidence, EvidenceRef, Finding, RuleInfo, Severity};
use crate::graph::{AppGraph, QueryOperation, StatementKind, SupabaseQueryNode};

fn evidence(query: &SupabaseQueryNode, reason: &str) -> Vec<EvidenceRef> {
    vec![EvidenceRef::at(query.file_path.clone(), query.line)
        .with_snippet(query.snippet.clone())
        .with_reason(reason)]
}

pub struct QueryNoPagination;

const QUERY_NO_PAGINATION: RuleInfo = RuleInfo {
    code: "QUERY_NO_PAGINATION",
    category: Category::Performance,
    severity: Severity::High,
    confidence: Confidence::Medium,
    title: "List query without pagination",
    fix_summary: "Bound the result set with .range() or .limit().",
    fix_steps: &[
        "Add .range(from, to) driven by page parameters",
        "Or cap the result with .limit(n)",
    ],
};

impl Rule for QueryNoPagination {
    fn info(&self) -> &RuleInfo {
        &QUERY_NO_PAGINATION
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        graph
            .supabase_queries()
            .filter(|q| q.operation == QueryOperation::Select)
            .filter(|q| !q.has_pagination && !q.is_single_row && !q.is_count_only)
            .filter_map(|q| {
                Finding::new(
                    &QUERY_NO_PAGINATION,
                    format!("Select on `{}` returns every matching row.", q.table),
                    evidence(q, "no .range() or .limit() in the chain"),
                )
                .map(|f| f.with_related(vec![q.table.clone()]))
            })
            .collect()
    }
}

pub struct QuerySelectStar;

const QUERY_SELECT_STAR: RuleInfo = RuleInfo {
    code: "QUERY_SELECT_STAR",
    category: Category::Performance,
    severity: Severity::Medium,
    confidence: Confidence::High,
    title: "Query selects every column",
    fix_summary: "List the needed columns in .select().",
    fix_steps: &["Replace .select('*') or .select() with .select('id, name, ...')"],
};

impl Rule for QuerySelectStar {
    fn info(&self) -> &RuleInfo {
        &QUERY_SELECT_STAR
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        graph
            .supabase_queries()
            .filter(|q| q.operation == QueryOperation::Select && q.select_all)
            .filter_map(|q| {
                Finding::new(
                    &QUERY_SELECT_STAR,
                    format!("Select on `{}` fetches all columns.", q.table),
                    evidence(q, "select('*') or bare select()"),
                )
                .map(|f| f.with_related(vec![q.table.clone()]))
            })
            .collect()
    }
}

pub struct MutationWithoutFilter;

const MUTATION_WITHOUT_FILTER: RuleInfo = RuleInfo {
    code: "MUTATION_WITHOUT_FILTER",
    category: Category::DataSafety,
    severity: Severity::Critical,
    confidence: Confidence::Medium,
    title: "Update or delete without a filter",
    fix_summary: "Constrain the mutation with a filter such as .eq('id', id).",
    fix_steps: &[
        "Add a filter (.eq, .in, .match) identifying the target rows",
        "Confirm row-level security limits the rows a user can touch",
    ],
};

impl Rule for MutationWithoutFilter {
    fn info(&self) -> &RuleInfo {
        &MUTATION_WITHOUT_FILTER
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        graph
            .supabase_queries()
            .filter(|q| matches!(q.operation, QueryOperation::Update | QueryOperation::Delete))
            .filter(|q| !q.has_filter)
            .filter_map(|q| {
                Finding::new(
                    &MUTATION_WITHOUT_FILTER,
                    format!(
                        "{} on `{}` has no filter and may affect every row.",
                        q.operation.name(),
                        q.table
                    ),
                    evidence(q, "no filter in the chain"),
                )
                .map(|f| f.with_related(vec![q.table.clone()]))
            })
            .collect()
    }
}

pub struct QueryUnknownTable;

const QUERY_UNKNOWN_TABLE: RuleInfo = RuleInfo {
    code: "QUERY_UNKNOWN_TABLE",
    category: Category::DataSafety,
    severity: Severity::Low,
    confidence: Confidence::Low,
    title: "Query against a table no migration creates",
    fix_summary: "Add a migration for the table or fix the table name.",
    fix_steps: &[
        "Check the table name for typos",
        "Commit the migration that creates the table",
    ],
};

impl Rule for QueryUnknownTable {
    fn info(&self) -> &RuleInfo {
        &QUERY_UNKNOWN_TABLE
    }

    fn evaluate(&self, graph: &AppGraph, _ctx: &RuleContext<'_>) -> Vec<Finding> {
        let created: FxHashSet<&str> = graph
            .migrations()
            .flat_map(|m| m.statements.iter())
            .filter(|s| s.kind == StatementKind::CreateTable)
            .map(|s| s.table.as_str())
            .collect();
        if created.is_empty() {
            return Vec::new();
        }

        graph
            .supabase_queries()
            .filter(|q| q.operation != QueryOperation::Storage)
            .filter(|q| {
                let table = q.table.to_ascii_lowercase();
                let table = table.strip_prefix("public.").unwrap_or(&table);
                !created.contains(table)
            })
            .filter_map(|q| {
                Finding::new(
                    &QUERY_UNKNOWN_TABLE,
                    format!("No migration creates table `{}`.", q.table),
                    evidence(q, "table not found in migrations"),
                )
                .map(|f| f.with_related(vec![q.table.clone()]))
            })
            .collect()
    }
}
