//! Graph node types, one struct per kind, unified under a tagged enum.

use serde::{Deserialize, Serialize};

/// Discriminant for the node buckets of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Route,
    Endpoint,
    Callsite,
    SupabaseQuery,
    UiAction,
    EnvVar,
    Migration,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Route => "Route",
            Self::Endpoint => "Endpoint",
            Self::Callsite => "Callsite",
            Self::SupabaseQuery => "SupabaseQuery",
            Self::UiAction => "UiAction",
            Self::EnvVar => "EnvVar",
            Self::Migration => "Migration",
        }
    }

    pub fn all() -> &'static [NodeKind] {
        &[
            Self::Route,
            Self::Endpoint,
            Self::Callsite,
            Self::SupabaseQuery,
            Self::UiAction,
            Self::EnvVar,
            Self::Migration,
        ]
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which router convention produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    App,
    Pages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    pub id: String,
    /// URL path, e.g. `/blog/[slug]` or `/api/users`.
    pub path: String,
    pub source_file: String,
    pub is_api_route: bool,
    pub is_page: bool,
    pub router: RouterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn parse(raw: &str) -> Option<HttpMethod> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Methods that change server state.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch | Self::Delete)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandlerKind {
    RouteHandler,
    ServerAction,
    ApiHandler,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointNode {
    pub id: String,
    /// Empty for pages-router handlers with no detectable method checks (any method).
    pub methods: Vec<HttpMethod>,
    pub file_path: String,
    pub line: u32,
    pub handler_kind: HandlerKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_path: Option<String>,
    pub has_auth_check: bool,
    pub has_error_handling: bool,
    pub reads_body: bool,
    pub has_input_validation: bool,
}

impl EndpointNode {
    /// Server actions, handlers accepting any method, or handlers with a
    /// mutating method.
    pub fn is_mutating(&self) -> bool {
        self.handler_kind == HandlerKind::ServerAction
            || self.methods.is_empty()
            || self.methods.iter().any(HttpMethod::is_mutating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Fetch,
    Axios,
    Router,
}

impl CallKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Axios => "axios",
            Self::Router => "router",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallsiteNode {
    pub id: String,
    pub call_kind: CallKind,
    /// Literal target with delimiters stripped; template substitutions kept.
    pub target_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<HttpMethod>,
    pub file_path: String,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOperation {
    Select,
    Insert,
    Update,
    Delete,
    Storage,
}

impl QueryOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Storage => "storage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupabaseQueryNode {
    pub id: String,
    /// Table name, or the bucket name for storage operations.
    pub table: String,
    pub operation: QueryOperation,
    pub has_pagination: bool,
    pub select_all: bool,
    pub is_single_row: bool,
    pub is_count_only: bool,
    pub has_filter: bool,
    pub file_path: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarNode {
    pub id: String,
    pub name: String,
    pub in_example: bool,
    /// Access is the left operand of `||` or `??`.
    pub has_default: bool,
    pub file_path: String,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatementKind {
    CreateTable,
    EnableRls,
    DisableRls,
    CreatePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStatement {
    pub kind: StatementKind,
    /// Unquoted, lower-cased, `public.` stripped.
    pub table: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationNode {
    pub id: String,
    pub file_path: String,
    pub statements: Vec<MigrationStatement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiElement {
    Button,
    Link,
    Form,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiActionNode {
    pub id: String,
    pub element: UiElement,
    /// Tag as written, e.g. `Button` or `a`.
    pub tag: String,
    /// Handler attribute name, e.g. `onClick`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    pub empty_handler: bool,
    pub console_only: bool,
    pub todo_marker: bool,
    pub placeholder_href: bool,
    pub file_path: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl UiActionNode {
    pub fn is_stub(&self) -> bool {
        self.empty_handler || self.console_only || self.todo_marker || self.placeholder_href
    }
}

/// A graph node of any kind, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GraphNode {
    Route(RouteNode),
    Endpoint(EndpointNode),
    Callsite(CallsiteNode),
    SupabaseQuery(SupabaseQueryNode),
    UiAction(UiActionNode),
    EnvVar(EnvVarNode),
    Migration(MigrationNode),
}

impl GraphNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Route(_) => NodeKind::Route,
            Self::Endpoint(_) => NodeKind::Endpoint,
            Self::Callsite(_) => NodeKind::Callsite,
            Self::SupabaseQuery(_) => NodeKind::SupabaseQuery,
            Self::UiAction(_) => NodeKind::UiAction,
            Self::EnvVar(_) => NodeKind::EnvVar,
            Self::Migration(_) => NodeKind::Migration,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Route(n) => &n.id,
            Self::Endpoint(n) => &n.id,
            Self::Callsite(n) => &n.id,
            Self::SupabaseQuery(n) => &n.id,
            Self::UiAction(n) => &n.id,
            Self::EnvVar(n) => &n.id,
            Self::Migration(n) => &n.id,
        }
    }

    /// File the node was extracted from.
    pub fn file_path(&self) -> &str {
        match self {
            Self::Route(n) => &n.source_file,
            Self::Endpoint(n) => &n.file_path,
            Self::Callsite(n) => &n.file_path,
            Self::SupabaseQuery(n) => &n.file_path,
            Self::UiAction(n) => &n.file_path,
            Self::EnvVar(n) => &n.file_path,
            Self::Migration(n) => &n.file_path,
        }
    }
}

macro_rules! impl_from_node {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for GraphNode {
                fn from(node: $node) -> Self {
                    GraphNode::$variant(node)
                }
            }
        )*
    };
}

impl_from_node! {
    RouteNode => Route,
    EndpointNode => Endpoint,
    CallsiteNode => Callsite,
    SupabaseQueryNode => SupabaseQuery,
    UiActionNode => UiAction,
    EnvVarNode => EnvVar,
    MigrationNode => Migration,
}
