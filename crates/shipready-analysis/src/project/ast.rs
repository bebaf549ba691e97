//! Small syntax-tree helpers shared by the extractors.

use tree_sitter::Node;

const SNIPPET_MAX_CHARS: usize = 120;

/// Source text covered by `node`.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// 1-based line of the node start.
pub fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

/// Pre-order traversal. Returning `false` from `visit` skips the node's children.
pub fn walk<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> bool) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visit(node) {
            continue;
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
}

/// Every descendant (including `root`) of the given kind, in source order.
pub fn descendants_of_kind<'t>(root: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut found = Vec::new();
    walk(root, |node| {
        if node.kind() == kind {
            found.push(node);
        }
        true
    });
    found
}

/// Contents of a `string` or `template_string` literal with the delimiters
/// removed. Template substitutions are kept verbatim.
pub fn string_literal_value(node: Node<'_>, source: &str) -> Option<String> {
    let text = node_text(node, source);
    match node.kind() {
        "string" | "template_string" if text.len() >= 2 => Some(text[1..text.len() - 1].to_string()),
        _ => None,
    }
}

/// Whether the node is a string or template literal.
pub fn is_string_like(node: Node<'_>) -> bool {
    matches!(node.kind(), "string" | "template_string")
}

/// Callee text of a `call_expression`, e.g. `axios.get`.
pub fn callee_text<'a>(call: Node<'_>, source: &'a str) -> &'a str {
    call.child_by_field_name("function")
        .map(|f| node_text(f, source))
        .unwrap_or("")
}

/// Argument nodes of a `call_expression`, comments excluded.
pub fn call_arguments<'t>(call: Node<'t>) -> Vec<Node<'t>> {
    let Some(args) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    (0..args.named_child_count())
        .filter_map(|i| args.named_child(i))
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Named children, comments excluded.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// First line of the node's text, trimmed and capped for evidence output.
pub fn snippet(node: Node<'_>, source: &str) -> String {
    let first = node_text(node, source).lines().next().unwrap_or("").trim();
    if first.chars().count() <= SNIPPET_MAX_CHARS {
        first.to_string()
    } else {
        let mut cut: String = first.chars().take(SNIPPET_MAX_CHARS).collect();
        cut.push('…');
        cut
    }
}

/// Bytes covered by outermost ERROR nodes.
pub fn error_bytes(root: Node<'_>) -> usize {
    if !root.has_error() {
        return 0;
    }
    let mut total = 0;
    walk(root, |node| {
        if node.is_error() {
            total += node.end_byte() - node.start_byte();
            return false;
        }
        node.has_error()
    });
    total
}

/// Whether the function-like node is any flavor of function.
pub fn is_function_like(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "function_declaration"
            | "function_expression"
            | "function"
            | "arrow_function"
            | "generator_function_declaration"
            | "method_definition"
    )
}
