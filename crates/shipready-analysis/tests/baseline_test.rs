//! Baseline file parsing, baseline matching and inline suppression comments.

use rustc_hash::FxHashMap;
use shipready_analysis::enforcement::baseline::{
    BaselineEntry, BaselineMatcher, InlineSuppressor, ValidationBaseline,
};
use shipready_analysis::enforcement::rules::{
    Category, Confidence, EvidenceRef, Finding, RuleInfo, Severity,
};
use shipready_core::errors::BaselineError;

const STUB: RuleInfo = RuleInfo {
    code: "UI_STUB_ACTION",
    category: Category::Ui,
    severity: Severity::Low,
    confidence: Confidence::Medium,
    title: "stub",
    fix_summary: "wire it",
    fix_steps: &[],
};

const RLS: RuleInfo = RuleInfo {
    code: "TABLE_WITHOUT_RLS",
    category: Category::Security,
    severity: Severity::Critical,
    confidence: Confidence::High,
    title: "rls",
    fix_summary: "enable rls",
    fix_steps: &[],
};

fn finding(info: &RuleInfo, file: &str, line: u32) -> Finding {
    Finding::new(info, "d", vec![EvidenceRef::at(file, line)]).unwrap()
}

fn lines(file: &str, content: &str) -> FxHashMap<String, Vec<String>> {
    let mut map = FxHashMap::default();
    map.insert(
        file.to_string(),
        content.lines().map(str::to_string).collect(),
    );
    map
}

// ---- baseline file ----

#[test]
fn parses_camel_case_entries() {
    let baseline = ValidationBaseline::parse(
        r#"{
  "version": 1,
  "suppress": [
    { "ruleId": "UI_STUB_ACTION", "filePath": "components/", "line": 7 },
    { "ruleId": "TABLE_WITHOUT_RLS", "gapId": "abc" }
  ]
}"#,
    )
    .unwrap();
    assert_eq!(baseline.version, Some(1));
    assert_eq!(baseline.suppress.len(), 2);
    assert_eq!(baseline.suppress[0].file_path.as_deref(), Some("components/"));
    assert_eq!(baseline.suppress[0].line, Some(7));
    assert_eq!(baseline.suppress[1].gap_id.as_deref(), Some("abc"));
}

#[test]
fn missing_suppress_list_is_empty() {
    let baseline = ValidationBaseline::parse("{}").unwrap();
    assert!(baseline.is_empty());
}

#[test]
fn rejects_blank_rule_id() {
    let err = ValidationBaseline::parse(r#"{"suppress":[{"ruleId":"A"},{"ruleId":"  "}]}"#)
        .unwrap_err();
    assert!(matches!(err, BaselineError::InvalidEntry { index: 1, .. }));
}

#[test]
fn rejects_malformed_json() {
    let err = ValidationBaseline::parse("{ not json").unwrap_err();
    assert!(matches!(err, BaselineError::ParseError { .. }));
}

#[test]
fn load_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("validation-baseline.json");
    std::fs::write(&path, "[").unwrap();
    match ValidationBaseline::load(&path).unwrap_err() {
        BaselineError::ParseError { path: reported, .. } => {
            assert!(reported.ends_with("validation-baseline.json"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let missing = dir.path().join("nope.json");
    assert!(matches!(
        ValidationBaseline::load(&missing).unwrap_err(),
        BaselineError::Unreadable { .. }
    ));
}

// ---- matcher ----

fn matcher(entries: Vec<BaselineEntry>) -> BaselineMatcher {
    BaselineMatcher::new(&ValidationBaseline {
        version: None,
        suppress: entries,
    })
}

#[test]
fn rule_only_entry_matches_every_finding_of_that_rule() {
    let m = matcher(vec![BaselineEntry::rule("UI_STUB_ACTION")]);
    assert!(m.matches(&finding(&STUB, "components/a.tsx", 3)));
    assert!(m.matches(&finding(&STUB, "app/page.tsx", 9)));
    assert!(!m.matches(&finding(&RLS, "supabase/migrations/1.sql", 1)));
}

#[test]
fn path_is_a_substring_unless_it_has_glob_characters() {
    let substring = matcher(vec![BaselineEntry {
        file_path: Some("components/".to_string()),
        ..BaselineEntry::rule("UI_STUB_ACTION")
    }]);
    assert!(substring.matches(&finding(&STUB, "src/components/a.tsx", 3)));
    assert!(!substring.matches(&finding(&STUB, "app/page.tsx", 3)));

    let glob = matcher(vec![BaselineEntry {
        file_path: Some("app/**/*.tsx".to_string()),
        ..BaselineEntry::rule("UI_STUB_ACTION")
    }]);
    assert!(glob.matches(&finding(&STUB, "app/settings/page.tsx", 3)));
    assert!(!glob.matches(&finding(&STUB, "src/app/settings/page.tsx", 3)));
    assert!(!glob.matches(&finding(&STUB, "app/settings/page.ts", 3)));
}

#[test]
fn windows_separators_in_entries_are_normalized() {
    let m = matcher(vec![BaselineEntry {
        file_path: Some("components\\a.tsx".to_string()),
        ..BaselineEntry::rule("UI_STUB_ACTION")
    }]);
    assert!(m.matches(&finding(&STUB, "components/a.tsx", 3)));
}

#[test]
fn path_and_line_must_hold_on_the_same_evidence() {
    let mut f = finding(&STUB, "a.tsx", 3);
    f.evidence.push(EvidenceRef::at("b.tsx", 9));

    let same = matcher(vec![BaselineEntry {
        file_path: Some("b.tsx".to_string()),
        line: Some(9),
        ..BaselineEntry::rule("UI_STUB_ACTION")
    }]);
    assert!(same.matches(&f));

    let crossed = matcher(vec![BaselineEntry {
        file_path: Some("a.tsx".to_string()),
        line: Some(9),
        ..BaselineEntry::rule("UI_STUB_ACTION")
    }]);
    assert!(!crossed.matches(&f));
}

#[test]
fn gap_id_pins_one_finding() {
    let a = finding(&STUB, "a.tsx", 3);
    let b = finding(&STUB, "a.tsx", 4);
    let m = matcher(vec![BaselineEntry {
        gap_id: Some(a.id.clone()),
        ..BaselineEntry::rule("UI_STUB_ACTION")
    }]);
    assert!(m.matches(&a));
    assert!(!m.matches(&b));
}

#[test]
fn apply_counts_only_newly_suppressed() {
    let mut findings = vec![
        finding(&STUB, "a.tsx", 3),
        finding(&STUB, "b.tsx", 4),
        finding(&RLS, "m.sql", 1),
    ];
    findings[1].mark_suppressed();
    let m = matcher(vec![BaselineEntry::rule("UI_STUB_ACTION")]);
    assert_eq!(m.apply(&mut findings), 1);
    assert!(findings[0].suppressed);
    assert!(findings[1].suppressed);
    assert!(!findings[2].suppressed);
}

#[test]
fn empty_baseline_matches_nothing() {
    let m = BaselineMatcher::new(&ValidationBaseline::default());
    assert!(m.is_empty());
    assert!(!m.matches(&finding(&STUB, "a.tsx", 1)));
}

// ---- inline comments ----

#[test]
fn bare_marker_on_line_above_suppresses_all_rules() {
    let src = "// shipready-ignore\n<button onClick={() => {}}>x</button>\n";
    let map = lines("a.tsx", src);
    let s = InlineSuppressor::new();
    assert!(s.is_suppressed(&finding(&STUB, "a.tsx", 2), &map));
    assert!(s.is_suppressed(&finding(&RLS, "a.tsx", 2), &map));
}

#[test]
fn listed_codes_only_suppress_those_rules() {
    let src = "// shipready-ignore TABLE_WITHOUT_RLS -- reviewed\nline two\n";
    let map = lines("a.tsx", src);
    let s = InlineSuppressor::new();
    assert!(s.is_suppressed(&finding(&RLS, "a.tsx", 2), &map));
    assert!(!s.is_suppressed(&finding(&STUB, "a.tsx", 2), &map));
}

#[test]
fn jsx_comment_on_the_same_line() {
    let src = "<div>\n  <button onClick={() => {}}>x</button> {/* shipready-ignore UI_STUB_ACTION */}\n</div>\n";
    let map = lines("a.tsx", src);
    assert!(InlineSuppressor::new().is_suppressed(&finding(&STUB, "a.tsx", 2), &map));
}

#[test]
fn sql_comment_above_statement() {
    let src = "-- shipready-ignore TABLE_WITHOUT_RLS\ncreate table public.audit (id int);\n";
    let map = lines("supabase/migrations/1.sql", src);
    assert!(InlineSuppressor::new()
        .is_suppressed(&finding(&RLS, "supabase/migrations/1.sql", 2), &map));
}

#[test]
fn eslint_directive_must_name_the_rule() {
    let s = InlineSuppressor::new();
    let named = lines(
        "a.tsx",
        "// eslint-disable-next-line shipready/UI_STUB_ACTION\n<button onClick={() => {}} />\n",
    );
    assert!(s.is_suppressed(&finding(&STUB, "a.tsx", 2), &named));

    let bare = lines(
        "a.tsx",
        "// eslint-disable-next-line\n<button onClick={() => {}} />\n",
    );
    assert!(!s.is_suppressed(&finding(&STUB, "a.tsx", 2), &bare));
}

#[test]
fn marker_two_lines_above_does_not_count() {
    let src = "// shipready-ignore\n\n<button onClick={() => {}} />\n";
    let map = lines("a.tsx", src);
    assert!(!InlineSuppressor::new().is_suppressed(&finding(&STUB, "a.tsx", 3), &map));
}

#[test]
fn trailing_marker_covers_only_its_own_line() {
    let src = "const a = 1; // shipready-ignore\n<button onClick={() => {}} />\n";
    let map = lines("a.tsx", src);
    let s = InlineSuppressor::new();
    assert!(s.is_suppressed(&finding(&STUB, "a.tsx", 1), &map));
    assert!(!s.is_suppressed(&finding(&STUB, "a.tsx", 2), &map));

    let src = "<Save /> {/* shipready-ignore UI_STUB_ACTION */}\n<button onClick={() => {}} />\n";
    let map = lines("a.tsx", src);
    assert!(!s.is_suppressed(&finding(&STUB, "a.tsx", 2), &map));
}

#[test]
fn marker_inside_a_string_is_ignored() {
    let src = "const label = 'shipready-ignore';\n<button onClick={() => {}} />\n";
    let map = lines("a.tsx", src);
    assert!(!InlineSuppressor::new().is_suppressed(&finding(&STUB, "a.tsx", 2), &map));
}

#[test]
fn unknown_file_is_never_suppressed() {
    let map = lines("other.tsx", "// shipready-ignore\nx\n");
    let mut findings = vec![finding(&STUB, "a.tsx", 2)];
    assert_eq!(InlineSuppressor::new().apply(&mut findings, &map), 0);
    assert!(!findings[0].suppressed);
}
