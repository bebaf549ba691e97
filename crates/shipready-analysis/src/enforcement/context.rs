//! `ValidationContext` — the persisted scan result.
//!
//! This is the machine contract consumed outside the scanner. Field names and
//! enumeration values are stable; new fields are optional and additive, and
//! any breaking shape change bumps [`SCHEMA_VERSION`].

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use shipready_core::constants::{SCHEMA_VERSION, VERSION};

use crate::enforcement::checklist::{ChecklistItem, ShipStatus};
use crate::enforcement::rules::Finding;
use crate::graph::{AppGraph, HttpMethod, RouterKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub path: String,
    pub source_file: String,
    pub is_api_route: bool,
    pub is_page: bool,
    pub router: RouterKind,
    /// Methods of the handlers defined in `source_file`, sorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<HttpMethod>,
}

impl RouteEntry {
    /// Routes from the graph ordered by path, then source file.
    pub fn collect(graph: &AppGraph) -> Vec<RouteEntry> {
        let mut routes: Vec<RouteEntry> = graph
            .routes()
            .map(|route| {
                let mut methods: Vec<HttpMethod> = graph
                    .endpoints()
                    .filter(|e| e.file_path == route.source_file)
                    .flat_map(|e| e.methods.iter().copied())
                    .collect();
                methods.sort();
                methods.dedup();
                RouteEntry {
                    path: route.path.clone(),
                    source_file: route.source_file.clone(),
                    is_api_route: route.is_api_route,
                    is_page: route.is_page,
                    router: route.router,
                    methods,
                }
            })
            .collect();
        routes.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.source_file.cmp(&b.source_file))
        });
        routes
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub files_indexed: usize,
    pub migration_files: usize,
    pub files_parsed: usize,
    pub files_skipped: usize,
    /// Node count per graph kind.
    pub node_counts: BTreeMap<String, usize>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationContext {
    pub schema_version: u32,
    /// RFC 3339, UTC.
    pub generated_at: String,
    pub scanner_version: String,
    pub routes: Vec<RouteEntry>,
    pub gaps: Vec<Finding>,
    pub ship_checklist: Vec<ChecklistItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_checklist_status: Option<ShipStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppressed_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ScanStats>,
}

impl ValidationContext {
    /// Empty context stamped with the current time and versions.
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: now_rfc3339(),
            scanner_version: VERSION.to_string(),
            routes: Vec::new(),
            gaps: Vec::new(),
            ship_checklist: Vec::new(),
            ship_checklist_status: None,
            suppressed_count: None,
            error: None,
            stats: None,
        }
    }

    /// A context carrying only an error message, written when a scan aborts.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new()
        }
    }

    pub fn status(&self) -> Option<ShipStatus> {
        self.ship_checklist_status
    }

    pub fn open_gaps(&self) -> impl Iterator<Item = &Finding> {
        self.gaps.iter().filter(|g| !g.suppressed)
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
