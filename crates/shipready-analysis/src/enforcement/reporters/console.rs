//! Console reporter — terminal summary with color codes.

use shipready_core::errors::ReportError;

use super::Reporter;
use crate::enforcement::checklist::ShipStatus;
use crate::enforcement::context::ValidationContext;
use crate::enforcement::rules::{Finding, Severity};

/// How many open findings are listed before the summary truncates.
const TOP_FINDINGS: usize = 10;

pub struct ConsoleReporter {
    pub use_color: bool,
}

impl ConsoleReporter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn status_symbol(status: Option<ShipStatus>) -> &'static str {
        match status {
            Some(ShipStatus::Ship) => "✓",
            Some(ShipStatus::NeedsReview) => "⚠",
            Some(ShipStatus::NoShip) => "✗",
            None => "⚡",
        }
    }

    fn color_start(&self, severity: Severity) -> &'static str {
        if !self.use_color {
            return "";
        }
        match severity {
            Severity::Critical => "\x1b[1;31m", // bold red
            Severity::High => "\x1b[31m",       // red
            Severity::Medium => "\x1b[33m",     // yellow
            Severity::Low => "\x1b[90m",        // gray
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }

    fn status_color(&self, status: Option<ShipStatus>) -> &'static str {
        match status {
            Some(ShipStatus::Ship) if self.use_color => "\x1b[32m",
            Some(ShipStatus::NeedsReview) => self.color_start(Severity::Medium),
            Some(ShipStatus::NoShip) | None => self.color_start(Severity::Critical),
            Some(ShipStatus::Ship) => "",
        }
    }

    fn finding_line(&self, finding: &Finding) -> String {
        let location = finding
            .primary_evidence()
            .map(|ev| match ev.line {
                Some(line) => format!("{}:{}", ev.file_path, line),
                None => ev.file_path.clone(),
            })
            .unwrap_or_default();
        format!(
            "  {}{:<8}{} {} {}: {}\n",
            self.color_start(finding.severity),
            finding.severity.name(),
            self.color_end(),
            finding.code,
            location,
            finding.title
        )
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn file_name(&self) -> Option<&'static str> {
        None
    }

    fn render(&self, context: &ValidationContext) -> Result<String, ReportError> {
        let mut output = String::new();

        output.push_str("╔══════════════════════════════════════════╗\n");
        output.push_str("║        shipready Readiness Report        ║\n");
        output.push_str("╚══════════════════════════════════════════╝\n\n");

        if let Some(ref error) = context.error {
            output.push_str(&format!(
                "{}error:{} {}\n",
                self.color_start(Severity::Critical),
                self.color_end(),
                error
            ));
            return Ok(output);
        }

        let mut open: Vec<&Finding> = context.open_gaps().collect();
        open.sort_by(|a, b| b.severity.cmp(&a.severity));

        for severity in Severity::descending() {
            let count = open.iter().filter(|f| f.severity == severity).count();
            if count > 0 {
                output.push_str(&format!(
                    "  {}{}{}: {}\n",
                    self.color_start(severity),
                    severity.name(),
                    self.color_end(),
                    count
                ));
            }
        }
        if !open.is_empty() {
            output.push('\n');
        }

        for finding in open.iter().take(TOP_FINDINGS) {
            output.push_str(&self.finding_line(finding));
        }
        if open.len() > TOP_FINDINGS {
            output.push_str(&format!("  … and {} more\n", open.len() - TOP_FINDINGS));
        }

        let suppressed = context.suppressed_count.unwrap_or(0);
        let failing: Vec<&str> = context
            .ship_checklist
            .iter()
            .filter(|item| !item.status.passed())
            .map(|item| item.category.name())
            .collect();

        output.push_str(&format!(
            "\n─── Summary: {} routes, {} open gaps, {} suppressed ───\n",
            context.routes.len(),
            open.len(),
            suppressed
        ));
        if !failing.is_empty() {
            output.push_str(&format!("Failing checks: {}\n", failing.join(", ")));
        }

        let status = context.ship_checklist_status;
        let status_name = status.map(|s| s.name().to_ascii_uppercase()).unwrap_or_else(|| "UNKNOWN".into());
        output.push_str(&format!(
            "Status: {}{}{} {}\n",
            self.status_color(status),
            status_name,
            self.color_end(),
            Self::status_symbol(status)
        ));

        Ok(output)
    }
}
