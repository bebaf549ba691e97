//! The node store: kind → ordered nodes, ids unique per kind.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use super::types::*;

/// Append-only fact base shared by extractors (`&mut`) and rules (`&`).
#[derive(Debug, Default, Clone)]
pub struct AppGraph {
    nodes: BTreeMap<NodeKind, Vec<GraphNode>>,
    ids: FxHashSet<(NodeKind, String)>,
}

impl AppGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. A duplicate id within the same kind is ignored and
    /// `false` is returned.
    pub fn add(&mut self, node: impl Into<GraphNode>) -> bool {
        let node = node.into();
        let kind = node.kind();
        if !self.ids.insert((kind, node.id().to_string())) {
            tracing::debug!(kind = %kind, id = node.id(), "duplicate graph node ignored");
            return false;
        }
        self.nodes.entry(kind).or_default().push(node);
        true
    }

    /// All nodes of one kind, in insertion order.
    pub fn nodes(&self, kind: NodeKind) -> &[GraphNode] {
        self.nodes.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, kind: NodeKind, id: &str) -> bool {
        self.ids.contains(&(kind, id.to_string()))
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes(kind).len()
    }

    pub fn total(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Node count for every kind, zero counts included.
    pub fn node_counts(&self) -> BTreeMap<String, usize> {
        NodeKind::all()
            .iter()
            .map(|kind| (kind.name().to_string(), self.count(*kind)))
            .collect()
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes(NodeKind::Route).iter().filter_map(|n| match n {
            GraphNode::Route(r) => Some(r),
            _ => None,
        })
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointNode> {
        self.nodes(NodeKind::Endpoint).iter().filter_map(|n| match n {
            GraphNode::Endpoint(e) => Some(e),
            _ => None,
        })
    }

    pub fn callsites(&self) -> impl Iterator<Item = &CallsiteNode> {
        self.nodes(NodeKind::Callsite).iter().filter_map(|n| match n {
            GraphNode::Callsite(c) => Some(c),
            _ => None,
        })
    }

    pub fn supabase_queries(&self) -> impl Iterator<Item = &SupabaseQueryNode> {
        self.nodes(NodeKind::SupabaseQuery)
            .iter()
            .filter_map(|n| match n {
                GraphNode::SupabaseQuery(q) => Some(q),
                _ => None,
            })
    }

    pub fn ui_actions(&self) -> impl Iterator<Item = &UiActionNode> {
        self.nodes(NodeKind::UiAction).iter().filter_map(|n| match n {
            GraphNode::UiAction(u) => Some(u),
            _ => None,
        })
    }

    pub fn env_vars(&self) -> impl Iterator<Item = &EnvVarNode> {
        self.nodes(NodeKind::EnvVar).iter().filter_map(|n| match n {
            GraphNode::EnvVar(e) => Some(e),
            _ => None,
        })
    }

    pub fn migrations(&self) -> impl Iterator<Item = &MigrationNode> {
        self.nodes(NodeKind::Migration).iter().filter_map(|n| match n {
            GraphNode::Migration(m) => Some(m),
            _ => None,
        })
    }

    /// Nodes of `kind` extracted from `file_path`.
    pub fn count_for_file(&self, kind: NodeKind, file_path: &str) -> usize {
        self.nodes(kind)
            .iter()
            .filter(|n| n.file_path() == file_path)
            .count()
    }
}
