//! `shipready scan`: config resolution, pipeline run, report output.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use shipready_analysis::enforcement::reporters::console::ConsoleReporter;
use shipready_analysis::enforcement::reporters::json::JsonReporter;
use shipready_analysis::enforcement::reporters::{write_report, Reporter};
use shipready_analysis::enforcement::ValidationContext;
use shipready_analysis::pipeline::write_reports;
use shipready_analysis::{ScanOptions, ScanPipeline};
use shipready_core::config::shipready_config::is_severity_level;
use shipready_core::config::{CliOverrides, ShipreadyConfig};
use shipready_core::constants::{DEFAULT_FAIL_ON, DEFAULT_FORMATS, KNOWN_FORMATS};
use shipready_core::errors::{PipelineError, ShipreadyErrorCode};

use crate::cli::ScanArgs;

pub const EXIT_OK: u8 = 0;
pub const EXIT_THRESHOLD: u8 = 1;
pub const EXIT_FATAL: u8 = 2;

/// What the caller prints once the scan is done.
pub struct ScanReport {
    pub exit_code: u8,
    pub console: Option<String>,
}

/// Run a scan. Fatal errors are reported on stderr, recorded in an error-only
/// context when the report directory is known, and mapped to exit code 2.
pub fn run(args: &ScanArgs) -> ScanReport {
    let mut out_dir = None;
    match scan(args, &mut out_dir) {
        Ok(report) => report,
        Err(e) => {
            let message = e.coded_string();
            tracing::error!(code = e.error_code(), "scan aborted");
            eprintln!("{message}");
            if let Some(dir) = out_dir.filter(|_| args.project.is_dir()) {
                write_error_context(&message, &dir);
            }
            ScanReport {
                exit_code: EXIT_FATAL,
                console: None,
            }
        }
    }
}

fn scan(args: &ScanArgs, out_dir: &mut Option<PathBuf>) -> Result<ScanReport, PipelineError> {
    let overrides = overrides_from(args);
    let config = ShipreadyConfig::load(&args.project, args.config.as_deref(), Some(&overrides))?;
    let formats = config.report.effective_formats();

    let options = ScanOptions::new(&args.project, config);
    let dir = options.out_dir();
    *out_dir = Some(dir.clone());

    let outcome = ScanPipeline::new(options).run()?;
    for path in write_reports(&outcome.context, &formats, &dir)? {
        tracing::info!(path = %path.display(), "report written");
    }

    let console = if args.quiet {
        None
    } else {
        Some(ConsoleReporter::new(use_color()).render(&outcome.context)?)
    };

    let exit_code = if outcome.exceeds_threshold() {
        tracing::info!(fail_on = %outcome.fail_on, "findings at or above the fail-on threshold");
        EXIT_THRESHOLD
    } else {
        EXIT_OK
    };
    Ok(ScanReport { exit_code, console })
}

/// Flags that override configuration. Bad `--format` / `--fail-on` values
/// fall back to defaults.
pub fn overrides_from(args: &ScanArgs) -> CliOverrides {
    CliOverrides {
        out_dir: args.out.clone(),
        formats: sanitize_formats(&args.format),
        fail_on: sanitize_fail_on(args.fail_on.as_deref()),
        baseline: args.baseline.clone(),
        threads: args.threads,
    }
}

/// Known formats from `raw`, lowercased and deduplicated. `None` when no
/// format was requested; the defaults when none of the requested ones exist.
pub fn sanitize_formats(raw: &[String]) -> Option<Vec<String>> {
    let requested: Vec<&str> = raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if requested.is_empty() {
        return None;
    }
    let mut formats: Vec<String> = Vec::new();
    for format in requested {
        let lower = format.to_ascii_lowercase();
        let normalized = if lower == "markdown" { "md".to_string() } else { lower };
        if !KNOWN_FORMATS.contains(&normalized.as_str()) {
            tracing::warn!(format = %format, "ignoring unknown report format");
            continue;
        }
        if !formats.contains(&normalized) {
            formats.push(normalized);
        }
    }
    if formats.is_empty() {
        tracing::warn!("no valid report format given, using defaults");
        formats = DEFAULT_FORMATS.iter().map(|s| s.to_string()).collect();
    }
    Some(formats)
}

pub fn sanitize_fail_on(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if is_severity_level(raw) {
        Some(raw.to_ascii_uppercase())
    } else {
        tracing::warn!(fail_on = %raw, default = DEFAULT_FAIL_ON, "invalid --fail-on, using default");
        Some(DEFAULT_FAIL_ON.to_string())
    }
}

fn write_error_context(message: &str, out_dir: &Path) {
    let context = ValidationContext::from_error(message);
    match write_report(&JsonReporter, &context, out_dir) {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "error context written"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not write error context"),
    }
}

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
