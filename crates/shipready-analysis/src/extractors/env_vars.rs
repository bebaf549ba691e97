//! Environment variable reads, cross-referenced with the example env file.

use std::path::Path;

use rustc_hash::FxHashSet;
use tree_sitter::Node;

use crate::graph::{AppGraph, EnvVarNode, NodeKind};
use crate::project::ast::{line_of, node_text, string_literal_value, walk};
use crate::project::SourceFile;

use super::{ExtractionContext, Extractor};

const ENV_OBJECTS: &[&str] = &["process.env", "import.meta.env"];

/// Parse a dotenv-style file and return the declared names.
/// Accepts `KEY=value` and `export KEY=value`; comments and blanks are ignored.
pub fn parse_env_file(content: &str) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed).trim_start();
        if let Some(eq_pos) = trimmed.find('=') {
            let name = trimmed[..eq_pos].trim();
            if !name.is_empty() && !name.contains(char::is_whitespace) {
                names.insert(name.to_string());
            }
        }
    }
    names
}

/// Declared names from the first example file that exists under `root`.
/// `None` when no candidate exists.
pub fn load_declared(root: &Path, candidates: &[String]) -> Option<FxHashSet<String>> {
    for candidate in candidates {
        let path = root.join(candidate);
        if !path.is_file() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(file = %candidate, "loaded env declarations");
                return Some(parse_env_file(&content));
            }
            Err(e) => {
                tracing::debug!(file = %candidate, error = %e, "unreadable env example file");
            }
        }
    }
    None
}

/// One env access site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAccess {
    pub name: String,
    pub line: u32,
    pub column: usize,
    pub has_default: bool,
}

/// Find `process.env.X`, `process.env['X']`, `import.meta.env.X` and
/// `const { X } = process.env`.
pub fn find_env_accesses(root: Node<'_>, source: &str) -> Vec<EnvAccess> {
    let mut accesses = Vec::new();
    walk(root, |node| {
        match node.kind() {
            "member_expression" => {
                let is_env = node
                    .child_by_field_name("object")
                    .is_some_and(|o| ENV_OBJECTS.contains(&node_text(o, source)));
                if let Some(property) = node.child_by_field_name("property").filter(|_| is_env) {
                    push_access(&mut accesses, node, node_text(property, source).to_string());
                    return false;
                }
            }
            "subscript_expression" => {
                let is_env = node
                    .child_by_field_name("object")
                    .is_some_and(|o| ENV_OBJECTS.contains(&node_text(o, source)));
                if let Some(name) = node
                    .child_by_field_name("index")
                    .filter(|_| is_env)
                    .and_then(|i| string_literal_value(i, source))
                {
                    push_access(&mut accesses, node, name);
                    return false;
                }
            }
            "variable_declarator" => {
                let from_env = node
                    .child_by_field_name("value")
                    .is_some_and(|v| ENV_OBJECTS.contains(&node_text(v, source)));
                let pattern = node.child_by_field_name("name").filter(|_| from_env);
                if let Some(pattern) = pattern.filter(|p| p.kind() == "object_pattern") {
                    destructured_names(pattern, source, &mut accesses);
                }
            }
            _ => {}
        }
        true
    });
    accesses
}

fn push_access(accesses: &mut Vec<EnvAccess>, node: Node<'_>, name: String) {
    if name.is_empty() {
        return;
    }
    accesses.push(EnvAccess {
        name,
        line: line_of(node),
        column: node.start_position().column,
        has_default: is_defaulted(node),
    });
}

/// `process.env.X || 'fallback'` / `process.env.X ?? 'fallback'`.
fn is_defaulted(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    if parent.kind() != "binary_expression" {
        return false;
    }
    let is_left = parent
        .child_by_field_name("left")
        .is_some_and(|l| l.id() == node.id());
    let operator = parent.child_by_field_name("operator").map(|o| o.kind());
    is_left && matches!(operator, Some("||") | Some("??"))
}

fn destructured_names(pattern: Node<'_>, source: &str, accesses: &mut Vec<EnvAccess>) {
    for i in 0..pattern.named_child_count() {
        let Some(child) = pattern.named_child(i) else {
            continue;
        };
        let (key, has_default) = match child.kind() {
            "shorthand_property_identifier_pattern" => (Some(child), false),
            // `{ X = 'fallback' }`
            "object_assignment_pattern" => (child.child_by_field_name("left"), true),
            // `{ X: alias }`
            "pair_pattern" => (child.child_by_field_name("key"), false),
            _ => (None, false),
        };
        if let Some(key) = key {
            accesses.push(EnvAccess {
                name: node_text(key, source).to_string(),
                line: line_of(key),
                column: key.start_position().column,
                has_default,
            });
        }
    }
}

pub struct EnvVarsExtractor;

impl EnvVarsExtractor {
    fn extract_file(&self, graph: &mut AppGraph, file: &SourceFile, declared: &FxHashSet<String>) {
        for access in find_env_accesses(file.root(), &file.source) {
            graph.add(EnvVarNode {
                id: format!(
                    "env:{}:{}:{}:{}",
                    file.relative_path, access.line, access.column, access.name
                ),
                in_example: declared.contains(&access.name),
                name: access.name,
                has_default: access.has_default,
                file_path: file.relative_path.clone(),
                line: access.line,
            });
        }
    }
}

impl Extractor for EnvVarsExtractor {
    fn name(&self) -> &'static str {
        "env_vars"
    }

    fn kind(&self) -> NodeKind {
        NodeKind::EnvVar
    }

    fn extract(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>) {
        let declared = load_declared(ctx.project_root, &ctx.config.env.effective_example_files())
            .unwrap_or_default();
        for (_, file) in ctx.parsed_files() {
            self.extract_file(graph, file, &declared);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_names() {
        let names = parse_env_file("# comment\nA=1\nexport B=2\n\n C = 3\nnot a line\n");
        assert!(names.contains("A"));
        assert!(names.contains("B"));
        assert!(names.contains("C"));
        assert_eq!(names.len(), 3);
    }
}
