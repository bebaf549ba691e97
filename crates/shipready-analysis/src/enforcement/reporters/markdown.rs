//! Markdown reporter — human-readable digest of a scan.
//!
//! Layout: status banner, routes table, gaps grouped by severity
//! (CRITICAL first), then a checkbox checklist.

use std::fmt::Write;

use shipready_core::constants::MARKDOWN_REPORT_FILE;
use shipready_core::errors::ReportError;

use super::Reporter;
use crate::enforcement::checklist::ShipStatus;
use crate::enforcement::context::{RouteEntry, ValidationContext};
use crate::enforcement::rules::{Finding, Severity};

pub struct MarkdownReporter {
    pub title: String,
}

impl MarkdownReporter {
    pub fn new() -> Self {
        Self {
            title: "Ship Readiness Report".to_string(),
        }
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn banner(status: Option<ShipStatus>) -> &'static str {
        match status {
            Some(ShipStatus::Ship) => "✅ **SHIP**: no open critical or high findings.",
            Some(ShipStatus::NeedsReview) => "⚠️ **NEEDS REVIEW**: open high-severity findings.",
            Some(ShipStatus::NoShip) => "🛑 **NO SHIP**: open critical findings.",
            None => "❔ **UNKNOWN**: the scan did not complete.",
        }
    }

    /// Table cells cannot contain raw pipes or newlines.
    fn cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn location(finding: &Finding) -> String {
        match finding.primary_evidence() {
            Some(ev) => match ev.line {
                Some(line) => format!("{}:{}", ev.file_path, line),
                None => ev.file_path.clone(),
            },
            None => String::from("(no location)"),
        }
    }

    fn write_routes(out: &mut String, routes: &[RouteEntry]) {
        let _ = writeln!(out, "## Routes ({})\n", routes.len());
        if routes.is_empty() {
            out.push_str("_No routes detected._\n\n");
            return;
        }
        out.push_str("| Path | Type | Methods | Source |\n");
        out.push_str("|------|------|---------|--------|\n");
        for route in routes {
            let kind = match (route.is_api_route, route.is_page) {
                (true, _) => "api",
                (false, true) => "page",
                _ => "other",
            };
            let methods = if route.methods.is_empty() {
                String::from("-")
            } else {
                route
                    .methods
                    .iter()
                    .map(|m| m.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let _ = writeln!(
                out,
                "| `{}` | {} | {} | `{}` |",
                Self::cell(&route.path),
                kind,
                methods,
                Self::cell(&route.source_file)
            );
        }
        out.push('\n');
    }

    fn write_gaps(out: &mut String, gaps: &[Finding]) {
        let open = gaps.iter().filter(|g| !g.suppressed).count();
        let _ = writeln!(
            out,
            "## Gaps ({} open, {} suppressed)\n",
            open,
            gaps.len() - open
        );
        if gaps.is_empty() {
            out.push_str("_No gaps found._\n\n");
            return;
        }
        for severity in Severity::descending() {
            let group: Vec<&Finding> = gaps.iter().filter(|g| g.severity == severity).collect();
            if group.is_empty() {
                continue;
            }
            let _ = writeln!(out, "### {} ({})\n", severity, group.len());
            for gap in group {
                let suppressed = if gap.suppressed { " _(suppressed)_" } else { "" };
                let _ = writeln!(
                    out,
                    "- **`{}`** {} at `{}`{}",
                    gap.code,
                    gap.title,
                    Self::location(gap),
                    suppressed
                );
                let _ = writeln!(out, "  - {}", gap.description);
                let _ = writeln!(out, "  - Fix: {}", gap.recommended_fix.summary);
            }
            out.push('\n');
        }
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for MarkdownReporter {
    fn name(&self) -> &'static str {
        "md"
    }

    fn file_name(&self) -> Option<&'static str> {
        Some(MARKDOWN_REPORT_FILE)
    }

    fn render(&self, context: &ValidationContext) -> Result<String, ReportError> {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", self.title);
        let _ = writeln!(out, "{}\n", Self::banner(context.ship_checklist_status));
        let _ = writeln!(
            out,
            "Generated {} by shipready {} (schema v{}).\n",
            context.generated_at, context.scanner_version, context.schema_version
        );

        if let Some(ref error) = context.error {
            let _ = writeln!(out, "## Scan error\n\n```\n{error}\n```\n");
        }

        Self::write_routes(&mut out, &context.routes);
        Self::write_gaps(&mut out, &context.gaps);

        out.push_str("## Ship checklist\n\n");
        for item in &context.ship_checklist {
            let mark = if item.status.passed() { "x" } else { " " };
            if item.open_findings > 0 {
                let _ = writeln!(out, "- [{}] {} ({} open)", mark, item.label, item.open_findings);
            } else {
                let _ = writeln!(out, "- [{}] {}", mark, item.label);
            }
        }

        Ok(out)
    }
}
