//! Supabase query-builder chains.

use tree_sitter::Node;

use crate::graph::{AppGraph, NodeKind, QueryOperation, SupabaseQueryNode};
use crate::project::ast::{
    call_arguments, descendants_of_kind, line_of, named_children, node_text, snippet,
    string_literal_value,
};
use crate::project::SourceFile;

use super::{ExtractionContext, Extractor};

const NON_CLIENT_RECEIVERS: &[&str] = &["Array", "Buffer", "Object", "Promise"];
const OPERATIONS: &[&str] = &["select", "insert", "upsert", "update", "delete"];
const PAGINATION: &[&str] = &["range", "limit"];
const SINGLE_ROW: &[&str] = &["single", "maybeSingle"];
const FILTERS: &[&str] = &[
    "eq", "neq", "gt", "gte", "lt", "lte", "like", "ilike", "is", "in", "contains", "match",
    "filter", "or", "not",
];

/// One `.method(args)` link of a call chain.
#[derive(Debug, Clone)]
struct Link<'t> {
    method: String,
    args: Vec<Node<'t>>,
}

/// Flatten `a.from(x).select(y).eq(z)` into links in source order, plus the
/// receiver text (`a`).
fn flatten_chain<'t>(outer: Node<'t>, source: &str) -> (Vec<Link<'t>>, String) {
    let mut links = Vec::new();
    let mut current = outer;
    let receiver = loop {
        let Some(function) = current.child_by_field_name("function") else {
            break node_text(current, source).to_string();
        };
        if function.kind() != "member_expression" {
            break node_text(current, source).to_string();
        }
        let (Some(object), Some(property)) = (
            function.child_by_field_name("object"),
            function.child_by_field_name("property"),
        ) else {
            break node_text(current, source).to_string();
        };
        links.push(Link {
            method: node_text(property, source).to_string(),
            args: call_arguments(current),
        });
        let object = unwrap_await(object);
        if object.kind() == "call_expression" {
            current = object;
        } else {
            break node_text(object, source).to_string();
        }
    };
    links.reverse();
    (links, receiver)
}

fn unwrap_await(node: Node<'_>) -> Node<'_> {
    match node.kind() {
        "await_expression" | "parenthesized_expression" => {
            node.named_child(0).map(unwrap_await).unwrap_or(node)
        }
        _ => node,
    }
}

/// A call is the outermost of its chain unless it is the object of a member
/// access that is itself called.
fn is_outermost(call: Node<'_>) -> bool {
    let Some(parent) = call.parent() else {
        return true;
    };
    if parent.kind() != "member_expression" {
        return true;
    }
    !parent
        .parent()
        .is_some_and(|gp| gp.kind() == "call_expression")
}

/// Build a query node from the outermost call of a chain.
fn classify_chain(outer: Node<'_>, source: &str) -> Option<ClassifiedQuery> {
    let (links, receiver) = flatten_chain(outer, source);
    let from_index = links.iter().position(|l| {
        l.method == "from"
            && l.args
                .first()
                .is_some_and(|a| is_plain_literal(*a, source))
    })?;

    // The receiver of `.from` is whatever precedes it in the chain.
    let from_receiver = if from_index == 0 {
        receiver.as_str()
    } else {
        links[from_index - 1].method.as_str()
    };
    if NON_CLIENT_RECEIVERS.contains(&from_receiver) {
        return None;
    }
    let table = string_literal_value(links[from_index].args[0], source)?;
    let is_storage = from_receiver == "storage" || from_receiver.ends_with(".storage");

    let rest = &links[from_index + 1..];
    let has = |names: &[&str]| rest.iter().any(|l| names.contains(&l.method.as_str()));

    let operation_link = rest.iter().find(|l| OPERATIONS.contains(&l.method.as_str()));
    let operation = if is_storage {
        QueryOperation::Storage
    } else {
        match operation_link.map(|l| l.method.as_str()) {
            Some("insert") | Some("upsert") => QueryOperation::Insert,
            Some("update") => QueryOperation::Update,
            Some("delete") => QueryOperation::Delete,
            _ => QueryOperation::Select,
        }
    };

    let select = rest.iter().find(|l| l.method == "select");
    let select_all = operation == QueryOperation::Select
        && select.is_some_and(|link| match link.args.first() {
            None => true,
            Some(arg) => string_literal_value(*arg, source).is_some_and(|v| v.trim() == "*"),
        });
    let is_count_only = select
        .and_then(|l| l.args.get(1))
        .is_some_and(|opts| has_head_true(*opts, source));

    Some(ClassifiedQuery {
        table,
        operation,
        has_pagination: has(PAGINATION),
        select_all,
        is_single_row: has(SINGLE_ROW),
        is_count_only,
        has_filter: has(FILTERS),
    })
}

fn is_plain_literal(node: Node<'_>, source: &str) -> bool {
    node.kind() == "string"
        || (node.kind() == "template_string" && !node_text(node, source).contains("${"))
}

/// `{ count: 'exact', head: true }`
fn has_head_true(options: Node<'_>, source: &str) -> bool {
    options.kind() == "object"
        && named_children(options).into_iter().any(|p| {
            p.kind() == "pair"
                && p.child_by_field_name("key")
                    .is_some_and(|k| node_text(k, source).trim_matches(['"', '\'']) == "head")
                && p.child_by_field_name("value")
                    .is_some_and(|v| node_text(v, source) == "true")
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassifiedQuery {
    table: String,
    operation: QueryOperation,
    has_pagination: bool,
    select_all: bool,
    is_single_row: bool,
    is_count_only: bool,
    has_filter: bool,
}

pub struct SupabaseExtractor;

impl SupabaseExtractor {
    fn extract_file(&self, graph: &mut AppGraph, file: &SourceFile) {
        let source = file.source.as_str();
        for call in descendants_of_kind(file.root(), "call_expression") {
            if !is_outermost(call) {
                continue;
            }
            let Some(query) = classify_chain(call, source) else {
                continue;
            };
            let line = line_of(call);
            graph.add(SupabaseQueryNode {
                id: format!(
                    "supabase:{}:{}:{}",
                    file.relative_path,
                    line,
                    call.start_position().column
                ),
                table: query.table,
                operation: query.operation,
                has_pagination: query.has_pagination,
                select_all: query.select_all,
                is_single_row: query.is_single_row,
                is_count_only: query.is_count_only,
                has_filter: query.has_filter,
                file_path: file.relative_path.clone(),
                line,
                snippet: Some(snippet(call, source)),
            });
        }
    }
}

impl Extractor for SupabaseExtractor {
    fn name(&self) -> &'static str {
        "supabase"
    }

    fn kind(&self) -> NodeKind {
        NodeKind::SupabaseQuery
    }

    fn extract(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>) {
        for (_, file) in ctx.parsed_files() {
            self.extract_file(graph, file);
        }
    }
}
