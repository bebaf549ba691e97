//! The `shipready` binary: exit codes, report files, console output.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Run the binary with an isolated home and no `SHIPREADY_*` overrides.
fn shipready(home: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shipready"));
    cmd.args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("SHIPREADY_LOG")
        .env_remove("SHIPREADY_REPORT_FAIL_ON")
        .env_remove("SHIPREADY_REPORT_FORMATS")
        .env_remove("SHIPREADY_REPORT_OUT_DIR")
        .env_remove("SHIPREADY_SCAN_THREADS")
        .env_remove("SHIPREADY_SCAN_MAX_FILE_SIZE");
    cmd.output().unwrap()
}

fn project_with_open_table() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app/page.tsx", "export default function Home() { return null }\n");
    write(
        dir.path(),
        "supabase/migrations/001_init.sql",
        "create table public.todos (id bigint primary key);\n",
    );
    dir
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn critical_gap_exits_one_and_writes_reports() {
    let home = TempDir::new().unwrap();
    let project = project_with_open_table();
    let root = project.path().to_str().unwrap();

    let output = shipready(home.path(), &["scan", "--project", root]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Status: NO-SHIP"));
    assert!(stdout.contains("TABLE_WITHOUT_RLS"));

    let json = read_json(&project.path().join(".shipready/validation-context.json"));
    assert_eq!(json["schemaVersion"], 1);
    assert_eq!(json["shipChecklistStatus"], "no-ship");
    assert!(project.path().join(".shipready/validation-context.md").is_file());
}

#[test]
fn fail_on_below_threshold_exits_zero() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "lib/env.ts", "export const key = process.env.API_KEY;\n");
    let root = project.path().to_str().unwrap();

    let output = shipready(home.path(), &["scan", "--project", root, "--fail-on", "HIGH"]);
    assert_eq!(output.status.code(), Some(0));

    let output = shipready(home.path(), &["scan", "--project", root, "--fail-on", "medium"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn invalid_flags_fall_back_to_defaults() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "app/page.tsx", "export default function Home() { return null }\n");
    let root = project.path().to_str().unwrap();

    let output = shipready(
        home.path(),
        &["scan", "--project", root, "--format", "pdf,json", "--fail-on", "blocker"],
    );
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pdf"));
    assert!(stderr.contains("blocker"));
    assert!(project.path().join(".shipready/validation-context.json").is_file());
    assert!(!project.path().join(".shipready/validation-context.md").exists());
}

#[test]
fn custom_out_dir_and_quiet() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let root = project.path().to_str().unwrap();

    let output = shipready(home.path(), &["scan", "--project", root, "--out", "reports", "--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    let json = read_json(&project.path().join("reports/validation-context.json"));
    assert_eq!(json["shipChecklistStatus"], "ship");
    assert_eq!(json["routes"], serde_json::json!([]));
}

#[test]
fn baseline_flag_suppresses() {
    let home = TempDir::new().unwrap();
    let project = project_with_open_table();
    write(
        project.path(),
        "accepted.json",
        r#"{ "suppress": [ { "ruleId": "TABLE_WITHOUT_RLS" } ] }"#,
    );
    let root = project.path().to_str().unwrap();

    let output = shipready(home.path(), &["scan", "--project", root, "--baseline", "accepted.json"]);
    assert_eq!(output.status.code(), Some(0));
    let json = read_json(&project.path().join(".shipready/validation-context.json"));
    assert_eq!(json["suppressedCount"], 1);
    assert_eq!(json["gaps"][0]["suppressed"], true);
}

#[test]
fn missing_baseline_is_fatal_and_recorded() {
    let home = TempDir::new().unwrap();
    let project = project_with_open_table();
    let root = project.path().to_str().unwrap();

    let output = shipready(home.path(), &["scan", "--project", root, "--baseline", "nope.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[BASELINE_ERROR]"));

    let json = read_json(&project.path().join(".shipready/validation-context.json"));
    assert!(json["error"].as_str().unwrap().starts_with("[BASELINE_ERROR]"));
    assert!(json.get("shipChecklistStatus").is_none());
}

#[test]
fn broken_config_is_fatal() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "shipready.toml", "[report\nformats = 3");
    let root = project.path().to_str().unwrap();

    let output = shipready(home.path(), &["scan", "--project", root]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[CONFIG_ERROR]"));
    assert!(!project.path().join(".shipready").exists());
}

#[test]
fn missing_project_is_fatal() {
    let home = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();
    let missing = base.path().join("nope");

    let output = shipready(home.path(), &["scan", "--project", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[ROOT_UNREADABLE]"));
    assert!(!missing.exists());
}
