//! File-system routes for the Next.js app and pages routers.

use crate::graph::normalize::route_path_from_segments;
use crate::graph::{AppGraph, NodeKind, RouteNode, RouterKind};

use super::{ExtractionContext, Extractor};

const APP_PAGE_EXTS: &[&str] = &["tsx", "ts", "jsx", "js"];
const APP_ROUTE_EXTS: &[&str] = &["ts", "js"];
const PAGES_EXTS: &[&str] = &["tsx", "ts", "jsx", "js"];
const PAGES_SPECIAL: &[&str] = &["_app", "_document", "_error"];

/// What a route convention file resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFile {
    pub path: String,
    pub router: RouterKind,
    pub is_api_route: bool,
    pub is_page: bool,
}

/// Classify a relative path against the router conventions, with an
/// optional `src/` prefix.
pub fn classify_route_file(relative_path: &str) -> Option<RouteFile> {
    let path = relative_path.strip_prefix("src/").unwrap_or(relative_path);
    let (dir, file) = path.rsplit_once('/')?;
    let (stem, ext) = file.rsplit_once('.')?;

    if let Some(rest) = strip_root(dir, "app") {
        let is_page = stem == "page" && APP_PAGE_EXTS.contains(&ext);
        let is_route = stem == "route" && APP_ROUTE_EXTS.contains(&ext);
        if !is_page && !is_route {
            return None;
        }
        return Some(RouteFile {
            path: route_path_from_segments(rest.split('/')),
            router: RouterKind::App,
            is_api_route: is_route,
            is_page,
        });
    }

    if let Some(rest) = strip_root(dir, "pages") {
        if !PAGES_EXTS.contains(&ext) || PAGES_SPECIAL.contains(&stem) {
            return None;
        }
        let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        if stem != "index" {
            segments.push(stem);
        }
        let is_api = segments.first() == Some(&"api");
        return Some(RouteFile {
            path: route_path_from_segments(segments),
            router: RouterKind::Pages,
            is_api_route: is_api,
            is_page: !is_api,
        });
    }

    None
}

/// `app` → `Some("")`, `app/blog` → `Some("blog")`, anything else → `None`.
fn strip_root<'a>(dir: &'a str, root: &str) -> Option<&'a str> {
    if dir == root {
        return Some("");
    }
    dir.strip_prefix(root)?.strip_prefix('/')
}

pub struct RoutesExtractor;

impl Extractor for RoutesExtractor {
    fn name(&self) -> &'static str {
        "routes"
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Route
    }

    fn extract(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>) {
        for entry in ctx.files.iter().filter(|f| f.is_code()) {
            let Some(route) = classify_route_file(&entry.relative_path) else {
                continue;
            };
            graph.add(RouteNode {
                id: format!("route:{}", entry.relative_path),
                path: route.path,
                source_file: entry.relative_path.clone(),
                is_api_route: route.is_api_route,
                is_page: route.is_page,
                router: route.router,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_router_pages_and_handlers() {
        let page = classify_route_file("app/(shop)/products/[id]/page.tsx").unwrap();
        assert_eq!(page.path, "/products/[id]");
        assert!(page.is_page && !page.is_api_route);

        let api = classify_route_file("src/app/api/users/route.ts").unwrap();
        assert_eq!(api.path, "/api/users");
        assert!(api.is_api_route && !api.is_page);

        assert_eq!(classify_route_file("app/page.tsx").unwrap().path, "/");
        assert!(classify_route_file("app/layout.tsx").is_none());
        assert!(classify_route_file("app/api/route.tsx").is_none());
    }

    #[test]
    fn pages_router() {
        assert_eq!(classify_route_file("pages/index.tsx").unwrap().path, "/");
        let api = classify_route_file("pages/api/items/[id].ts").unwrap();
        assert_eq!(api.path, "/api/items/[id]");
        assert!(api.is_api_route);
        assert!(classify_route_file("pages/_app.tsx").is_none());
        assert!(classify_route_file("pages/_document.tsx").is_none());
        assert!(classify_route_file("lib/pages.ts").is_none());
    }
}
