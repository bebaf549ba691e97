//! End-to-end scan: index → parse → extract → evaluate → suppress → report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rustc_hash::FxHashMap;
use shipready_core::config::ShipreadyConfig;
use shipready_core::constants::BASELINE_FILE_NAME;
use shipready_core::errors::{PipelineError, ReportError};
use shipready_core::tracing::metrics;

use crate::enforcement::baseline::{BaselineMatcher, InlineSuppressor, ValidationBaseline};
use crate::enforcement::checklist::{build_checklist, compute_status};
use crate::enforcement::context::{RouteEntry, ScanStats, ValidationContext};
use crate::enforcement::reporters::{create_reporter, write_report};
use crate::enforcement::rules::{Finding, RuleContext, RuleEngine, Severity};
use crate::extractors::{ExtractionContext, ExtractorRegistry};
use crate::graph::AppGraph;
use crate::project::SourceProject;
use crate::scanner::FileIndexer;

/// Inputs of one scan run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub project_root: PathBuf,
    pub config: ShipreadyConfig,
}

impl ScanOptions {
    pub fn new(project_root: impl Into<PathBuf>, config: ShipreadyConfig) -> Self {
        Self {
            project_root: project_root.into(),
            config,
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.config.resolve_out_dir(&self.project_root)
    }

    /// Configured baseline, else `<project>/validation-baseline.json` when it
    /// exists.
    pub fn baseline_path(&self) -> Option<PathBuf> {
        self.config
            .resolve_baseline(&self.project_root)
            .or_else(|| {
                let conventional = self.project_root.join(BASELINE_FILE_NAME);
                conventional.is_file().then_some(conventional)
            })
    }

    /// Threshold for a failing exit; falls back to CRITICAL.
    pub fn fail_on(&self) -> Severity {
        Severity::parse(self.config.report.effective_fail_on()).unwrap_or(Severity::Critical)
    }
}

/// Result of a completed scan.
#[derive(Debug)]
pub struct ScanOutcome {
    pub context: ValidationContext,
    pub fail_on: Severity,
}

impl ScanOutcome {
    /// Any unsuppressed finding at or above the fail-on severity.
    pub fn exceeds_threshold(&self) -> bool {
        self.context.gaps.iter().any(|g| g.is_open_at(self.fail_on))
    }

    /// `1` when the threshold is exceeded, else `0`.
    pub fn exit_code(&self) -> i32 {
        if self.exceeds_threshold() {
            1
        } else {
            0
        }
    }
}

/// Runs the full scan for a project. Each run builds a fresh graph.
pub struct ScanPipeline {
    options: ScanOptions,
    extractors: ExtractorRegistry,
    rules: RuleEngine,
}

impl ScanPipeline {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            extractors: ExtractorRegistry::new(),
            rules: RuleEngine::new(),
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn run(&self) -> Result<ScanOutcome, PipelineError> {
        let started = Instant::now();
        let root = self.options.project_root.as_path();
        let config = &self.options.config;
        let span = tracing::info_span!("scan", root = %root.display());
        let _guard = span.enter();

        // A missing or broken baseline aborts before any work is done.
        let baseline = match self.options.baseline_path() {
            Some(path) => {
                let baseline = ValidationBaseline::load(&path)?;
                tracing::debug!(path = %path.display(), entries = baseline.suppress.len(), "baseline loaded");
                Some(baseline)
            }
            None => None,
        };

        let phase = Instant::now();
        let indexed = FileIndexer::new(root, &config.scan)
            .exclude_path(&self.options.out_dir())
            .index()?;
        for error in &indexed.errors {
            tracing::debug!(error = %error, "indexing issue");
        }
        let catalog = indexed.data;
        tracing::debug!({ metrics::PHASE_DURATION_MS } = elapsed_ms(phase), phase = "index");

        let phase = Instant::now();
        let parsed = SourceProject::build(root, &catalog.entries, &config.scan);
        for error in &parsed.errors {
            tracing::debug!(error = %error, "file skipped");
        }
        let project = parsed.data;
        tracing::debug!({ metrics::PHASE_DURATION_MS } = elapsed_ms(phase), phase = "parse");

        let phase = Instant::now();
        let mut graph = AppGraph::new();
        let extraction = ExtractionContext {
            files: &catalog.entries,
            project: &project,
            project_root: root,
            config,
        };
        self.extractors.run(&mut graph, &extraction);
        tracing::debug!({ metrics::PHASE_DURATION_MS } = elapsed_ms(phase), phase = "extract");

        let phase = Instant::now();
        let mut findings = self.rules.evaluate(&graph, &RuleContext { config });
        sort_findings(&mut findings);
        tracing::debug!({ metrics::PHASE_DURATION_MS } = elapsed_ms(phase), phase = "rules");

        let mut suppressed = 0;
        if let Some(ref baseline) = baseline {
            suppressed += BaselineMatcher::new(baseline).apply(&mut findings);
        }
        if config.report.effective_inline_suppression() {
            let lines = source_lines(root, &project, &findings);
            suppressed += InlineSuppressor::new().apply(&mut findings, &lines);
        }
        tracing::info!({ metrics::FINDINGS_SUPPRESSED } = suppressed, "suppression applied");

        let mut context = ValidationContext::new();
        context.routes = RouteEntry::collect(&graph);
        context.ship_checklist = build_checklist(&findings);
        context.ship_checklist_status = Some(compute_status(&findings));
        context.suppressed_count = Some(findings.iter().filter(|f| f.suppressed).count());
        context.gaps = findings;
        context.stats = Some(ScanStats {
            files_indexed: catalog.entries.len(),
            migration_files: catalog.migration_files().count(),
            files_parsed: project.len(),
            files_skipped: project.skipped_count() + catalog.skipped_large,
            node_counts: graph.node_counts(),
            duration_ms: elapsed_ms(started),
        });

        tracing::info!(
            status = %compute_status(&context.gaps),
            gaps = context.gaps.len(),
            { metrics::PHASE_DURATION_MS } = elapsed_ms(started),
            "scan complete"
        );

        Ok(ScanOutcome {
            context,
            fail_on: self.options.fail_on(),
        })
    }
}

/// Write one report per format into `out_dir`. Unknown formats are an error;
/// callers sanitize user input first.
pub fn write_reports(
    context: &ValidationContext,
    formats: &[String],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::new();
    for format in formats {
        let reporter =
            create_reporter(format).ok_or_else(|| ReportError::UnknownFormat(format.clone()))?;
        if let Some(path) = write_report(reporter.as_ref(), context, out_dir)? {
            written.push(path);
        }
    }
    Ok(written)
}

/// Severity descending, then location, then code.
fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        let loc = |f: &Finding| {
            f.primary_evidence()
                .map(|e| (e.file_path.clone(), e.line.unwrap_or(0)))
                .unwrap_or_default()
        };
        b.severity
            .cmp(&a.severity)
            .then_with(|| loc(a).cmp(&loc(b)))
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Lines of every file a finding points at. Parsed sources come from the
/// project; anything else (SQL migrations) is read from disk.
fn source_lines(
    root: &Path,
    project: &SourceProject,
    findings: &[Finding],
) -> FxHashMap<String, Vec<String>> {
    let mut lines: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for finding in findings {
        let Some(primary) = finding.primary_evidence() else {
            continue;
        };
        if lines.contains_key(&primary.file_path) {
            continue;
        }
        let text = match project.source_file(&primary.file_path) {
            Some(file) => Some(file.source.clone()),
            None => std::fs::read_to_string(root.join(&primary.file_path)).ok(),
        };
        if let Some(text) = text {
            lines.insert(
                primary.file_path.clone(),
                text.lines().map(str::to_string).collect(),
            );
        }
    }
    lines
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
