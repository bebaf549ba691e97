//! Route handlers, server actions and pages-router API handlers.

use shipready_core::types::collections::SmallVec2;
use tree_sitter::Node;

use crate::graph::{AppGraph, EndpointNode, HandlerKind, HttpMethod, NodeKind, RouterKind};
use crate::project::ast::{
    call_arguments, callee_text, is_function_like, line_of, named_children, node_text,
    string_literal_value, walk,
};
use crate::project::SourceFile;

use super::routes::classify_route_file;
use super::{callee_name, resolve_local_function, ExtractionContext, Extractor};

const AUTH_CALLS: &[&str] = &[
    "auth",
    "getServerSession",
    "getSession",
    "getUser",
    "currentUser",
    "requireAuth",
    "withAuth",
    "getToken",
    "requireUser",
    "verifySession",
];

const BODY_READERS: &[&str] = &["json", "formData"];
const VALIDATORS: &[&str] = &["parse", "safeParse", "parseAsync", "safeParseAsync"];

/// Facts gathered from one handler body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HandlerFacts {
    pub has_auth_check: bool,
    pub has_error_handling: bool,
    pub reads_body: bool,
    pub has_input_validation: bool,
    pub methods: SmallVec2<HttpMethod>,
}

/// Inspect a handler subtree.
pub fn analyze_handler(node: Node<'_>, source: &str) -> HandlerFacts {
    let mut facts = HandlerFacts::default();
    walk(node, |n| {
        match n.kind() {
            "call_expression" => {
                let callee = callee_text(n, source);
                let name = callee_name(callee);
                if AUTH_CALLS.contains(&name) {
                    facts.has_auth_check = true;
                }
                if callee.contains('.') && BODY_READERS.contains(&name) && call_arguments(n).is_empty() {
                    facts.reads_body = true;
                }
                if (callee.contains('.') && VALIDATORS.contains(&name))
                    || name.to_ascii_lowercase().contains("validate")
                {
                    facts.has_input_validation = true;
                }
            }
            "try_statement" => facts.has_error_handling = true,
            "member_expression" => {
                let object = n.child_by_field_name("object").map(|o| node_text(o, source));
                let property = n.child_by_field_name("property").map(|p| node_text(p, source));
                if matches!(object, Some("req") | Some("request")) && property == Some("body") {
                    facts.reads_body = true;
                }
            }
            "binary_expression" => {
                if let Some(method) = method_comparison(n, source) {
                    push_method(&mut facts.methods, method);
                }
            }
            "switch_statement" => {
                let on_method = n
                    .child_by_field_name("value")
                    .is_some_and(|v| node_text(v, source).contains(".method"));
                if on_method {
                    walk(n, |c| {
                        if c.kind() == "switch_case" {
                            if let Some(method) = c
                                .child_by_field_name("value")
                                .and_then(|v| string_literal_value(v, source))
                                .and_then(|v| HttpMethod::parse(&v))
                            {
                                push_method(&mut facts.methods, method);
                            }
                        }
                        true
                    });
                }
            }
            _ => {}
        }
        true
    });
    facts
}

/// `req.method === 'POST'` in either operand order.
fn method_comparison(node: Node<'_>, source: &str) -> Option<HttpMethod> {
    let operator = node.child_by_field_name("operator").map(|o| node_text(o, source))?;
    if !matches!(operator, "===" | "==" | "!==" | "!=") {
        return None;
    }
    let left = node.child_by_field_name("left")?;
    let right = node.child_by_field_name("right")?;
    let (member, literal) = if node_text(left, source).ends_with(".method") {
        (left, right)
    } else {
        (right, left)
    };
    if !node_text(member, source).ends_with(".method") {
        return None;
    }
    HttpMethod::parse(&string_literal_value(literal, source)?)
}

fn push_method(methods: &mut SmallVec2<HttpMethod>, method: HttpMethod) {
    if !methods.contains(&method) {
        methods.push(method);
    }
}

/// Whether the first statement of a program or block is `'use server'`.
fn starts_with_use_server(block: Node<'_>, source: &str) -> bool {
    named_children(block).first().is_some_and(|first| {
        first.kind() == "expression_statement"
            && first
                .named_child(0)
                .filter(|s| s.kind() == "string")
                .and_then(|s| string_literal_value(s, source))
                .is_some_and(|v| v == "use server")
    })
}

/// An exported binding: name, the node to analyze, and the declaration line.
struct Export<'t> {
    name: String,
    node: Node<'t>,
    line: u32,
    is_default: bool,
}

fn exported_bindings<'t>(root: Node<'t>, source: &str) -> Vec<Export<'t>> {
    let mut exports = Vec::new();
    for statement in named_children(root) {
        if statement.kind() != "export_statement" {
            continue;
        }
        let is_default = (0..statement.child_count())
            .filter_map(|i| statement.child(i))
            .any(|c| c.kind() == "default");

        if let Some(decl) = statement.child_by_field_name("declaration") {
            match decl.kind() {
                "function_declaration" | "generator_function_declaration" => {
                    let name = decl
                        .child_by_field_name("name")
                        .map(|n| node_text(n, source).to_string())
                        .unwrap_or_else(|| "default".to_string());
                    exports.push(Export {
                        name,
                        node: decl,
                        line: line_of(decl),
                        is_default,
                    });
                }
                "lexical_declaration" | "variable_declaration" => {
                    for declarator in named_children(decl) {
                        if declarator.kind() != "variable_declarator" {
                            continue;
                        }
                        let (Some(name), Some(value)) = (
                            declarator.child_by_field_name("name"),
                            declarator.child_by_field_name("value"),
                        ) else {
                            continue;
                        };
                        let node = if value.kind() == "identifier" {
                            resolve_local_function(root, node_text(value, source), source)
                                .unwrap_or(value)
                        } else {
                            value
                        };
                        exports.push(Export {
                            name: node_text(name, source).to_string(),
                            node,
                            line: line_of(declarator),
                            is_default: false,
                        });
                    }
                }
                _ => {}
            }
        } else if let Some(value) = statement.child_by_field_name("value") {
            // `export default handler` or `export default withAuth(handler)`
            let resolved = if value.kind() == "identifier" {
                resolve_local_function(root, node_text(value, source), source).unwrap_or(value)
            } else {
                value
            };
            let name = match value.kind() {
                "identifier" => node_text(value, source).to_string(),
                _ => resolved
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string())
                    .unwrap_or_else(|| "default".to_string()),
            };
            exports.push(Export {
                name,
                node: resolved,
                line: line_of(statement),
                is_default: true,
            });
        } else if let Some(clause) = named_children(statement)
            .into_iter()
            .find(|c| c.kind() == "export_clause")
        {
            // `export { GET, POST }`
            for specifier in named_children(clause) {
                let Some(local) = specifier.child_by_field_name("name") else {
                    continue;
                };
                let exported = specifier
                    .child_by_field_name("alias")
                    .unwrap_or(local);
                let local_name = node_text(local, source);
                if let Some(node) = resolve_local_function(root, local_name, source) {
                    exports.push(Export {
                        name: node_text(exported, source).to_string(),
                        node,
                        line: line_of(node),
                        is_default: node_text(exported, source) == "default",
                    });
                }
            }
        }
    }
    exports
}

pub struct EndpointsExtractor;

impl EndpointsExtractor {
    fn extract_file(&self, graph: &mut AppGraph, file: &SourceFile) {
        let source = file.source.as_str();
        let root = file.root();
        let route = classify_route_file(&file.relative_path);
        let exports = exported_bindings(root, source);
        let module_actions = starts_with_use_server(root, source);

        let mut add = |name: &str, node, line: u32, kind: HandlerKind, methods: Vec<HttpMethod>| {
            let facts = analyze_handler(node, source);
            let reads_body = facts.reads_body
                || (kind == HandlerKind::ServerAction && has_parameters(node));
            let methods = if methods.is_empty() { facts.methods.to_vec() } else { methods };
            let route_path = match kind {
                HandlerKind::ServerAction => None,
                _ => route.as_ref().map(|r| r.path.clone()),
            };
            graph.add(EndpointNode {
                id: format!("endpoint:{}#{}:{}", file.relative_path, name, line),
                methods,
                file_path: file.relative_path.clone(),
                line,
                handler_kind: kind,
                name: name.to_string(),
                route_path,
                has_auth_check: facts.has_auth_check,
                has_error_handling: facts.has_error_handling,
                reads_body,
                has_input_validation: facts.has_input_validation,
            });
        };

        match &route {
            Some(r) if r.router == RouterKind::App && r.is_api_route => {
                for export in &exports {
                    if let Some(method) = HttpMethod::parse(&export.name)
                        .filter(|_| export.name.chars().all(|c| c.is_ascii_uppercase()))
                    {
                        add(&export.name, export.node, export.line, HandlerKind::RouteHandler, vec![method]);
                    }
                }
            }
            Some(r) if r.router == RouterKind::Pages && r.is_api_route => {
                if let Some(export) = exports.iter().find(|e| e.is_default) {
                    add(&export.name, export.node, export.line, HandlerKind::ApiHandler, Vec::new());
                }
            }
            _ => {}
        }

        let mut seen_actions = Vec::new();
        if module_actions {
            for export in exports.iter().filter(|e| is_callable(e.node)) {
                seen_actions.push(export.node.id());
                add(&export.name, export.node, export.line, HandlerKind::ServerAction, Vec::new());
            }
        }

        // Functions whose own body opens with 'use server'.
        let mut inline = Vec::new();
        walk(root, |node| {
            if is_function_like(node)
                && node
                    .child_by_field_name("body")
                    .is_some_and(|b| b.kind() == "statement_block" && starts_with_use_server(b, source))
            {
                inline.push(node);
            }
            true
        });
        for node in inline {
            if seen_actions.contains(&node.id()) {
                continue;
            }
            let name = function_name(node, source);
            add(&name, node, line_of(node), HandlerKind::ServerAction, Vec::new());
        }
    }
}

impl Extractor for EndpointsExtractor {
    fn name(&self) -> &'static str {
        "endpoints"
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Endpoint
    }

    fn extract(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>) {
        for (_, file) in ctx.parsed_files() {
            self.extract_file(graph, file);
        }
    }
}

fn is_callable(node: Node<'_>) -> bool {
    is_function_like(node) || node.kind() == "call_expression"
}

fn has_parameters(node: Node<'_>) -> bool {
    if let Some(params) = node.child_by_field_name("parameters") {
        return params.named_child_count() > 0;
    }
    // `async x => ...`
    node.kind() == "arrow_function" && node.child_by_field_name("parameter").is_some()
}

/// Declared name of a function, or of the variable it is assigned to.
fn function_name(node: Node<'_>, source: &str) -> String {
    if let Some(name) = node.child_by_field_name("name") {
        return node_text(name, source).to_string();
    }
    node.parent()
        .filter(|p| p.kind() == "variable_declarator" || p.kind() == "pair")
        .and_then(|p| p.child_by_field_name("name").or_else(|| p.child_by_field_name("key")))
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}
