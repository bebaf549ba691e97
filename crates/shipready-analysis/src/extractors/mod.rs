//! Extractors: each reads the catalog and the parsed project and appends
//! one kind of node to the graph.

pub mod callsites;
pub mod endpoints;
pub mod env_vars;
pub mod migrations;
pub mod routes;
pub mod supabase;
pub mod ui_actions;

use std::path::Path;

use shipready_core::config::ShipreadyConfig;
use tree_sitter::Node;

use crate::graph::{AppGraph, NodeKind};
use crate::project::ast::{node_text, walk};
use crate::project::{SourceFile, SourceProject};
use crate::scanner::FileEntry;

/// Everything an extractor may read.
pub struct ExtractionContext<'a> {
    pub files: &'a [FileEntry],
    pub project: &'a SourceProject,
    pub project_root: &'a Path,
    pub config: &'a ShipreadyConfig,
}

impl<'a> ExtractionContext<'a> {
    pub fn source_file(&self, relative_path: &str) -> Option<&'a SourceFile> {
        self.project.source_file(relative_path)
    }

    /// Parsed non-migration files in catalog order.
    pub fn parsed_files(&self) -> impl Iterator<Item = (&'a FileEntry, &'a SourceFile)> + 'a {
        let project = self.project;
        self.files
            .iter()
            .filter(|f| !f.is_migration)
            .filter_map(move |f| project.source_file(&f.relative_path).map(|s| (f, s)))
    }

    pub fn migration_files(&self) -> impl Iterator<Item = &'a FileEntry> + 'a {
        self.files.iter().filter(|f| f.is_migration)
    }
}

/// A single extraction pass over the project.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// The node kind this extractor produces.
    fn kind(&self) -> NodeKind;

    fn extract(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>);
}

/// Create all built-in extractors in registry order.
pub fn create_all_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(routes::RoutesExtractor),
        Box::new(endpoints::EndpointsExtractor),
        Box::new(callsites::CallsitesExtractor),
        Box::new(supabase::SupabaseExtractor),
        Box::new(ui_actions::UiActionsExtractor),
        Box::new(env_vars::EnvVarsExtractor),
        Box::new(migrations::MigrationsExtractor),
    ]
}

/// Ordered extractor registry.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: create_all_extractors(),
        }
    }

    pub fn with_extractors(extractors: Vec<Box<dyn Extractor>>) -> Self {
        Self { extractors }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Run every extractor in order against a shared graph.
    pub fn run(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>) {
        for extractor in &self.extractors {
            let before = graph.count(extractor.kind());
            extractor.extract(graph, ctx);
            tracing::debug!(
                extractor = extractor.name(),
                added = graph.count(extractor.kind()) - before,
                "extractor finished"
            );
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Find a function declared in the file by name: `function name() {}` or
/// `const name = () => {}` / `const name = function () {}`.
pub(crate) fn resolve_local_function<'t>(root: Node<'t>, name: &str, source: &str) -> Option<Node<'t>> {
    let mut found = None;
    walk(root, |node| {
        if found.is_some() {
            return false;
        }
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if node
                    .child_by_field_name("name")
                    .is_some_and(|n| node_text(n, source) == name)
                {
                    found = Some(node);
                    return false;
                }
            }
            "variable_declarator" => {
                let named = node
                    .child_by_field_name("name")
                    .is_some_and(|n| node_text(n, source) == name);
                if let Some(value) = node.child_by_field_name("value").filter(|_| named) {
                    if matches!(value.kind(), "arrow_function" | "function_expression" | "function") {
                        found = Some(value);
                        return false;
                    }
                }
            }
            _ => {}
        }
        true
    });
    found
}

/// Last dotted segment of a callee, e.g. `getUser` for `supabase.auth.getUser`.
pub(crate) fn callee_name(callee: &str) -> &str {
    callee.rsplit('.').next().unwrap_or(callee).trim()
}
