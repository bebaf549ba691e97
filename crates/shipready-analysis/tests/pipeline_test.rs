//! End-to-end scans through `ScanPipeline`.

mod common;

use common::write;
use shipready_analysis::enforcement::checklist::ShipStatus;
use shipready_analysis::enforcement::rules::{Category, Confidence, EvidenceRef, Finding, RuleInfo, Severity};
use shipready_analysis::enforcement::ValidationContext;
use shipready_analysis::pipeline::write_reports;
use shipready_analysis::{ScanOptions, ScanOutcome, ScanPipeline};
use shipready_core::config::ShipreadyConfig;
use shipready_core::errors::{BaselineError, PipelineError, ReportError, ScanError};
use tempfile::TempDir;

const INIT_SQL: &str = "create table public.todos (id bigint primary key, title text);\n";

/// A page plus one migration creating a table without RLS.
fn unsafe_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app/page.tsx", "export default function Home() { return null }\n");
    write(dir.path(), "supabase/migrations/001_init.sql", INIT_SQL);
    dir
}

fn scan(root: &std::path::Path, config: ShipreadyConfig) -> Result<ScanOutcome, PipelineError> {
    ScanPipeline::new(ScanOptions::new(root, config)).run()
}

fn codes(ctx: &ValidationContext) -> Vec<&str> {
    ctx.gaps.iter().map(|g| g.code.as_str()).collect()
}

#[test]
fn open_critical_blocks_the_ship() {
    let dir = unsafe_project();
    let outcome = scan(dir.path(), ShipreadyConfig::default()).unwrap();
    let ctx = &outcome.context;

    assert_eq!(codes(ctx), vec!["TABLE_WITHOUT_RLS"]);
    assert_eq!(ctx.status(), Some(ShipStatus::NoShip));
    assert_eq!(ctx.suppressed_count, Some(0));
    assert_eq!(ctx.routes.len(), 1);
    assert_eq!(ctx.routes[0].path, "/");
    assert!(outcome.exceeds_threshold());
    assert_eq!(outcome.exit_code(), 1);

    let stats = ctx.stats.as_ref().unwrap();
    assert_eq!(stats.files_indexed, 2);
    assert_eq!(stats.migration_files, 1);
    assert_eq!(stats.files_parsed, 1);
    assert_eq!(stats.files_skipped, 0);
}

#[test]
fn conventional_baseline_is_picked_up() {
    let dir = unsafe_project();
    write(
        dir.path(),
        "validation-baseline.json",
        r#"{ "suppress": [ { "ruleId": "TABLE_WITHOUT_RLS", "filePath": "migrations/" } ] }"#,
    );
    let outcome = scan(dir.path(), ShipreadyConfig::default()).unwrap();
    let ctx = &outcome.context;

    assert_eq!(ctx.gaps.len(), 1);
    assert!(ctx.gaps[0].suppressed);
    assert_eq!(ctx.suppressed_count, Some(1));
    assert_eq!(ctx.status(), Some(ShipStatus::Ship));
    assert_eq!(outcome.exit_code(), 0);
}

#[test]
fn suppressed_critical_leaves_high_findings_for_review() {
    let dir = unsafe_project();
    write(
        dir.path(),
        "app/api/todos/route.ts",
        r#"export async function POST(request: Request) {
  const body = await request.json();
  return Response.json(body);
}
"#,
    );
    write(
        dir.path(),
        "baseline.json",
        r#"{ "suppress": [ { "ruleId": "TABLE_WITHOUT_RLS" } ] }"#,
    );
    let mut config = ShipreadyConfig::default();
    config.report.baseline = Some("baseline.json".to_string());

    let outcome = scan(dir.path(), config).unwrap();
    let ctx = &outcome.context;
    assert!(codes(ctx).contains(&"ENDPOINT_NO_AUTH"));
    assert_eq!(ctx.status(), Some(ShipStatus::NeedsReview));
    // Default threshold is CRITICAL.
    assert_eq!(outcome.exit_code(), 0);

    let api = ctx.routes.iter().find(|r| r.path == "/api/todos").unwrap();
    assert!(api.is_api_route);
    assert_eq!(api.methods.len(), 1);
}

#[test]
fn inline_sql_comment_suppresses() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "supabase/migrations/001_init.sql",
        &format!("-- shipready-ignore TABLE_WITHOUT_RLS -- audit log, service role only\n{INIT_SQL}"),
    );
    let mut config = ShipreadyConfig::default();
    config.report.inline_suppression = Some(true);
    let outcome = scan(dir.path(), config).unwrap();
    let ctx = &outcome.context;

    assert_eq!(codes(ctx), vec!["TABLE_WITHOUT_RLS"]);
    assert!(ctx.gaps[0].suppressed);
    assert_eq!(ctx.gaps[0].primary_evidence().unwrap().line, Some(2));
    assert_eq!(ctx.status(), Some(ShipStatus::Ship));
}

#[test]
fn source_comments_are_ignored_unless_enabled() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "lib/env.ts",
        "// shipready-ignore\nexport const key = process.env.SECRET_KEY;\n",
    );

    let outcome = scan(dir.path(), ShipreadyConfig::default()).unwrap();
    let ctx = &outcome.context;
    assert_eq!(codes(ctx), vec!["ENV_NOT_DECLARED"]);
    assert!(!ctx.gaps[0].suppressed);
    assert_eq!(ctx.suppressed_count, Some(0));

    let mut config = ShipreadyConfig::default();
    config.report.inline_suppression = Some(true);
    let outcome = scan(dir.path(), config).unwrap();
    assert!(outcome.context.gaps[0].suppressed);
    assert_eq!(outcome.context.suppressed_count, Some(1));
}

#[test]
fn empty_project_ships() {
    let dir = TempDir::new().unwrap();
    let outcome = scan(dir.path(), ShipreadyConfig::default()).unwrap();
    let ctx = &outcome.context;

    assert!(ctx.routes.is_empty());
    assert!(ctx.gaps.is_empty());
    assert_eq!(ctx.status(), Some(ShipStatus::Ship));
    assert_eq!(ctx.ship_checklist.len(), Category::all().len());
    assert!(ctx.ship_checklist.iter().all(|item| item.status.passed()));
    assert_eq!(outcome.exit_code(), 0);
}

#[test]
fn malformed_source_does_not_abort() {
    let dir = unsafe_project();
    write(dir.path(), "lib/broken.ts", "export const = ;;; {{{ ((( <<<\n");
    write(
        dir.path(),
        "lib/bad.ts",
        "export const rows = supabase.from('leaky').select('*');\nexport const broken = (( ;\n",
    );
    write(dir.path(), "lib/binary.ts", "");
    std::fs::write(dir.path().join("lib/binary.ts"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let outcome = scan(dir.path(), ShipreadyConfig::default()).unwrap();
    assert_eq!(outcome.context.routes.len(), 1);
    assert!(codes(&outcome.context).contains(&"TABLE_WITHOUT_RLS"));
    assert!(outcome
        .context
        .gaps
        .iter()
        .flat_map(|g| g.evidence.iter())
        .all(|e| e.file_path != "lib/bad.ts" && e.file_path != "lib/broken.ts"));
    assert!(outcome.context.stats.as_ref().unwrap().files_skipped >= 3);
}

#[test]
fn report_directory_is_not_scanned() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "reports/stale.ts", "export const k = process.env.SECRET_KEY;\n");
    write(dir.path(), ".shipready/old.ts", "export const k = process.env.OTHER_KEY;\n");

    let mut config = ShipreadyConfig::default();
    config.report.out_dir = Some("reports".to_string());
    let outcome = scan(dir.path(), config).unwrap();
    assert!(outcome.context.gaps.is_empty());
    assert_eq!(outcome.context.stats.as_ref().unwrap().files_indexed, 0);
}

#[test]
fn explicit_missing_baseline_is_fatal() {
    let dir = unsafe_project();
    let mut config = ShipreadyConfig::default();
    config.report.baseline = Some("missing-baseline.json".to_string());
    let err = scan(dir.path(), config).unwrap_err();
    assert!(matches!(err, PipelineError::Baseline(BaselineError::Unreadable { .. })));
}

#[test]
fn invalid_conventional_baseline_is_fatal() {
    let dir = unsafe_project();
    write(dir.path(), "validation-baseline.json", r#"{ "suppress": [ { "ruleId": "" } ] }"#);
    let err = scan(dir.path(), ShipreadyConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Baseline(BaselineError::InvalidEntry { index: 0, .. })));
}

#[test]
fn missing_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = scan(&dir.path().join("nope"), ShipreadyConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Scan(ScanError::RootUnreadable { .. })));
}

#[test]
fn fail_on_threshold() {
    const MEDIUM: RuleInfo = RuleInfo {
        code: "ENV_NOT_DECLARED",
        category: Category::Config,
        severity: Severity::Medium,
        confidence: Confidence::High,
        title: "env",
        fix_summary: "declare it",
        fix_steps: &[],
    };
    let mut context = ValidationContext::new();
    context.gaps = vec![Finding::new(&MEDIUM, "d", vec![EvidenceRef::at("lib/env.ts", 1)]).unwrap()];

    let outcome = ScanOutcome { context, fail_on: Severity::High };
    assert_eq!(outcome.exit_code(), 0);
    let mut outcome = ScanOutcome { fail_on: Severity::Medium, ..outcome };
    assert_eq!(outcome.exit_code(), 1);
    outcome.context.gaps[0].mark_suppressed();
    assert_eq!(outcome.exit_code(), 0);
}

#[test]
fn fail_on_comes_from_config() {
    let mut config = ShipreadyConfig::default();
    assert_eq!(ScanOptions::new(".", config.clone()).fail_on(), Severity::Critical);
    config.report.fail_on = Some("medium".to_string());
    assert_eq!(ScanOptions::new(".", config).fail_on(), Severity::Medium);
}

#[test]
fn writes_requested_reports() {
    let dir = unsafe_project();
    let options = ScanOptions::new(dir.path(), ShipreadyConfig::default());
    let outcome = ScanPipeline::new(options.clone()).run().unwrap();

    let formats = vec!["json".to_string(), "md".to_string(), "console".to_string()];
    let written = write_reports(&outcome.context, &formats, &options.out_dir()).unwrap();
    assert_eq!(written.len(), 2);
    assert!(options.out_dir().join("validation-context.json").is_file());
    assert!(options.out_dir().join("validation-context.md").is_file());

    let json = std::fs::read_to_string(options.out_dir().join("validation-context.json")).unwrap();
    let back: ValidationContext = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome.context);

    let err = write_reports(&outcome.context, &["pdf".to_string()], &options.out_dir()).unwrap_err();
    assert!(matches!(err, ReportError::UnknownFormat(f) if f == "pdf"));
}

#[test]
fn rescanning_with_reports_present_is_stable() {
    let dir = unsafe_project();
    let options = ScanOptions::new(dir.path(), ShipreadyConfig::default());
    let first = ScanPipeline::new(options.clone()).run().unwrap();
    write_reports(&first.context, &["json".to_string(), "md".to_string()], &options.out_dir()).unwrap();

    let second = ScanPipeline::new(options).run().unwrap();
    assert_eq!(first.context.gaps, second.context.gaps);
    assert_eq!(first.context.routes, second.context.routes);
}
