//! Outbound fetch/axios calls and client-side navigation.

use tree_sitter::Node;

use crate::graph::{AppGraph, CallKind, CallsiteNode, HttpMethod, NodeKind};
use crate::project::ast::{
    call_arguments, callee_text, descendants_of_kind, is_string_like, line_of, named_children,
    node_text, string_literal_value,
};
use crate::project::SourceFile;

use super::{ExtractionContext, Extractor};

const FETCH_CALLEES: &[&str] = &["fetch", "window.fetch", "globalThis.fetch"];
const AXIOS_VERBS: &[&str] = &["get", "post", "put", "patch", "delete", "head", "options"];
const ROUTER_METHODS: &[&str] = &["push", "replace", "prefetch"];

/// Classify one call expression.
pub fn classify_call(call: Node<'_>, source: &str) -> Option<(CallKind, String, Option<HttpMethod>)> {
    let callee = callee_text(call, source);
    let args = call_arguments(call);
    let first = *args.first()?;
    if !is_string_like(first) {
        return None;
    }
    let target = string_literal_value(first, source)?;

    if FETCH_CALLEES.contains(&callee) {
        if !(target.starts_with('/') || target.starts_with("http")) {
            return None;
        }
        let method = args.get(1).and_then(|opts| fetch_method(*opts, source));
        return Some((CallKind::Fetch, target, method));
    }

    if let Some(verb) = callee.strip_prefix("axios.") {
        if AXIOS_VERBS.contains(&verb) {
            return Some((CallKind::Axios, target, HttpMethod::parse(verb)));
        }
        return None;
    }

    if let Some(method) = callee.strip_prefix("router.") {
        if ROUTER_METHODS.contains(&method) {
            return Some((CallKind::Router, target, None));
        }
    }
    None
}

/// `{ method: 'POST' }` in a fetch options object.
fn fetch_method(options: Node<'_>, source: &str) -> Option<HttpMethod> {
    if options.kind() != "object" {
        return None;
    }
    named_children(options)
        .into_iter()
        .filter(|p| p.kind() == "pair")
        .find(|p| {
            p.child_by_field_name("key")
                .is_some_and(|k| node_text(k, source).trim_matches(['"', '\'']) == "method")
        })
        .and_then(|p| p.child_by_field_name("value"))
        .and_then(|v| string_literal_value(v, source))
        .and_then(|v| HttpMethod::parse(&v))
}

pub struct CallsitesExtractor;

impl CallsitesExtractor {
    fn extract_file(&self, graph: &mut AppGraph, file: &SourceFile) {
        let source = file.source.as_str();
        for call in descendants_of_kind(file.root(), "call_expression") {
            let Some((call_kind, target_path, http_method)) = classify_call(call, source) else {
                continue;
            };
            let line = line_of(call);
            graph.add(CallsiteNode {
                id: format!(
                    "callsite:{}:{}:{}",
                    file.relative_path,
                    line,
                    call.start_position().column
                ),
                call_kind,
                target_path,
                http_method,
                file_path: file.relative_path.clone(),
                line,
            });
        }
    }
}

impl Extractor for CallsitesExtractor {
    fn name(&self) -> &'static str {
        "callsites"
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Callsite
    }

    fn extract(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>) {
        for (_, file) in ctx.parsed_files() {
            self.extract_file(graph, file);
        }
    }
}
