//! Route path normalization and matching.

use super::app_graph::AppGraph;

/// Placeholder for a template substitution in a call target.
pub const PARAM_PLACEHOLDER: &str = ":param";

/// Build a URL path from route folder segments. Route groups `(group)` and
/// parallel slots `@slot` are dropped; dynamic segments are kept as written.
pub fn route_path_from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let kept: Vec<&str> = segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .filter(|s| !(s.starts_with('(') && s.ends_with(')')))
        .filter(|s| !s.starts_with('@'))
        .collect();
    format!("/{}", kept.join("/"))
}

/// Normalize a call target for matching: template substitutions become
/// `:param`, query strings and fragments are removed, duplicate and
/// trailing slashes are collapsed.
pub fn normalize_target_path(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        out.push_str(PARAM_PLACEHOLDER);
        let after = &rest[start + 2..];
        rest = match find_closing_brace(after) {
            Some(end) => &after[end + 1..],
            None => "",
        };
    }
    out.push_str(rest);

    let cut = out.find(['?', '#']).unwrap_or(out.len());
    out.truncate(cut);

    let segments: Vec<&str> = out.split('/').filter(|s| !s.is_empty()).collect();
    if out.starts_with('/') {
        format!("/{}", segments.join("/"))
    } else {
        segments.join("/")
    }
}

fn find_closing_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Whether a normalized target path can be served by a route path.
///
/// `[x]` matches one segment, `[...x]` one or more, `[[...x]]` zero or more.
/// A target segment carrying `:param` matches any single route segment.
pub fn route_matches(route_path: &str, target: &str) -> bool {
    let route: Vec<&str> = route_path.split('/').filter(|s| !s.is_empty()).collect();
    let target: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();
    segments_match(&route, &target)
}

fn segments_match(route: &[&str], target: &[&str]) -> bool {
    match (route.first(), target.first()) {
        (None, None) => true,
        (Some(seg), _) if seg.starts_with("[[...") => true,
        (Some(seg), Some(_)) if seg.starts_with("[...") => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(r), Some(t)) => {
            let single = is_dynamic(r) || t.contains(PARAM_PLACEHOLDER) || r == t;
            single && segments_match(&route[1..], &target[1..])
        }
    }
}

fn is_dynamic(segment: &str) -> bool {
    segment.starts_with('[') && segment.ends_with(']')
}

/// API and page route paths of a graph, for callsite lookups.
#[derive(Debug, Default, Clone)]
pub struct RouteIndex {
    api: Vec<String>,
    pages: Vec<String>,
}

impl RouteIndex {
    pub fn from_graph(graph: &AppGraph) -> Self {
        let mut index = RouteIndex::default();
        for route in graph.routes() {
            if route.is_api_route {
                index.api.push(route.path.clone());
            }
            if route.is_page {
                index.pages.push(route.path.clone());
            }
        }
        index
    }

    pub fn has_page_routes(&self) -> bool {
        !self.pages.is_empty()
    }

    pub fn matches_api(&self, target: &str) -> bool {
        let target = normalize_target_path(target);
        self.api.iter().any(|r| route_matches(r, &target))
    }

    pub fn matches_page(&self, target: &str) -> bool {
        let target = normalize_target_path(target);
        self.pages.iter().any(|r| route_matches(r, &target))
    }
}
