//! Interactive JSX controls and stub-handler detection.

use tree_sitter::Node;

use crate::graph::{AppGraph, NodeKind, UiActionNode, UiElement};
use crate::project::ast::{
    callee_text, is_function_like, line_of, named_children, node_text, snippet,
    string_literal_value, walk,
};
use crate::project::SourceFile;

use super::{resolve_local_function, ExtractionContext, Extractor};

const STUB_MARKERS: &[&str] = &["TODO", "FIXME"];

/// Stub flags for one handler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StubFlags {
    pub empty_handler: bool,
    pub console_only: bool,
    pub todo_marker: bool,
}

fn element_for_tag(tag: &str) -> Option<UiElement> {
    match tag {
        "button" | "Button" => Some(UiElement::Button),
        "a" | "Link" => Some(UiElement::Link),
        "form" | "Form" => Some(UiElement::Form),
        _ => None,
    }
}

fn handler_attributes(element: UiElement) -> &'static [&'static str] {
    match element {
        UiElement::Button => &["onClick"],
        UiElement::Link => &["onClick"],
        UiElement::Form => &["onSubmit", "action"],
    }
}

/// Whether a call only logs or notifies: `console.*`, `toast(...)`,
/// `toast.*`, `alert(...)`.
fn is_notify_call(call: Node<'_>, source: &str) -> bool {
    let callee = callee_text(call, source);
    callee.starts_with("console.")
        || callee == "toast"
        || callee.starts_with("toast.")
        || callee == "alert"
        || callee == "window.alert"
}

fn expression_is_notify(expr: Node<'_>, source: &str) -> bool {
    let expr = match expr.kind() {
        "await_expression" => match expr.named_child(0) {
            Some(inner) => inner,
            None => return false,
        },
        _ => expr,
    };
    expr.kind() == "call_expression" && is_notify_call(expr, source)
}

/// Classify a function-like handler by its body.
pub fn stub_flags(function: Node<'_>, source: &str) -> StubFlags {
    let Some(body) = function.child_by_field_name("body") else {
        return StubFlags::default();
    };
    let text = node_text(body, source);
    let todo_marker = STUB_MARKERS.iter().any(|m| text.contains(m));

    if body.kind() != "statement_block" {
        // Expression-bodied arrow.
        let empty = matches!(body.kind(), "undefined" | "null")
            || (body.kind() == "identifier" && node_text(body, source) == "undefined");
        return StubFlags {
            empty_handler: empty,
            console_only: expression_is_notify(body, source),
            todo_marker,
        };
    }

    let statements = named_children(body);
    if statements.is_empty() {
        return StubFlags {
            empty_handler: true,
            console_only: false,
            todo_marker,
        };
    }
    let console_only = statements.iter().all(|s| {
        s.kind() == "expression_statement"
            && s.named_child(0).is_some_and(|e| expression_is_notify(e, source))
    });
    StubFlags {
        empty_handler: false,
        console_only,
        todo_marker,
    }
}

/// Attribute name → value node for a JSX opening or self-closing element.
fn attributes<'t>(opening: Node<'t>, source: &str) -> Vec<(String, Option<Node<'t>>)> {
    named_children(opening)
        .into_iter()
        .filter(|c| c.kind() == "jsx_attribute")
        .filter_map(|attr| {
            let parts = named_children(attr);
            let name = parts.first()?;
            Some((node_text(*name, source).to_string(), parts.get(1).copied()))
        })
        .collect()
}

/// Unwrap `{expr}` to `expr`.
fn expression_value(value: Node<'_>) -> Option<Node<'_>> {
    match value.kind() {
        "jsx_expression" => value.named_child(0),
        _ => Some(value),
    }
}

fn is_placeholder_href(value: Option<Node<'_>>, source: &str) -> bool {
    let Some(value) = value.and_then(expression_value) else {
        return false;
    };
    string_literal_value(value, source).is_some_and(|v| v.trim().is_empty() || v.trim() == "#")
}

pub struct UiActionsExtractor;

impl UiActionsExtractor {
    fn extract_file(&self, graph: &mut AppGraph, file: &SourceFile) {
        let source = file.source.as_str();
        let root = file.root();

        let mut openings = Vec::new();
        walk(root, |node| {
            match node.kind() {
                "jsx_opening_element" | "jsx_self_closing_element" => openings.push(node),
                _ => {}
            }
            true
        });

        for opening in openings {
            let Some(tag) = opening
                .child_by_field_name("name")
                .map(|n| node_text(n, source).to_string())
            else {
                continue;
            };
            let Some(element) = element_for_tag(&tag) else {
                continue;
            };
            let attrs = attributes(opening, source);

            let mut handler = None;
            let mut flags = StubFlags::default();
            for (name, value) in &attrs {
                if !handler_attributes(element).contains(&name.as_str()) {
                    continue;
                }
                handler = Some(name.clone());
                if let Some(function) = value
                    .and_then(expression_value)
                    .and_then(|expr| resolve_handler(root, expr, source))
                {
                    flags = stub_flags(function, source);
                }
                break;
            }

            let placeholder_href = element == UiElement::Link
                && handler.is_none()
                && attrs
                    .iter()
                    .find(|(name, _)| name == "href")
                    .is_some_and(|(_, value)| is_placeholder_href(*value, source));
            if placeholder_href {
                handler = Some("href".to_string());
            }

            let line = line_of(opening);
            graph.add(UiActionNode {
                id: format!(
                    "ui:{}:{}:{}",
                    file.relative_path,
                    line,
                    opening.start_position().column
                ),
                element,
                tag,
                handler,
                empty_handler: flags.empty_handler,
                console_only: flags.console_only,
                todo_marker: flags.todo_marker,
                placeholder_href,
                file_path: file.relative_path.clone(),
                line,
                snippet: Some(snippet(opening, source)),
            });
        }
    }
}

/// Inline functions are used directly; identifiers resolve to a same-file
/// function. Anything else is opaque.
fn resolve_handler<'t>(root: Node<'t>, expr: Node<'t>, source: &str) -> Option<Node<'t>> {
    if is_function_like(expr) {
        return Some(expr);
    }
    if expr.kind() == "identifier" {
        return resolve_local_function(root, node_text(expr, source), source);
    }
    None
}

impl Extractor for UiActionsExtractor {
    fn name(&self) -> &'static str {
        "ui_actions"
    }

    fn kind(&self) -> NodeKind {
        NodeKind::UiAction
    }

    fn extract(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>) {
        for (_, file) in ctx.parsed_files() {
            self.extract_file(graph, file);
        }
    }
}
