//! Rule engine over fixture projects and hand-built graphs.

mod common;

use common::{build_graph, codes, evaluate, lines_for, write, ENV_READS, SUPABASE_QUERIES, TOOLBAR};
use shipready_analysis::enforcement::rules::{
    create_finding, Category, Confidence, EvidenceRef, Finding, RuleContext, RuleEngine, RuleInfo,
    Severity,
};
use shipready_analysis::graph::{
    AppGraph, CallKind, CallsiteNode, MigrationNode, MigrationStatement, RouteNode,
    RouterKind, StatementKind,
};
use shipready_core::config::ShipreadyConfig;
use tempfile::TempDir;

fn migration(file: &str, statements: &[(StatementKind, &str, u32)]) -> MigrationNode {
    MigrationNode {
        id: format!("migration:{file}"),
        file_path: file.to_string(),
        statements: statements
            .iter()
            .map(|(kind, table, line)| MigrationStatement {
                kind: *kind,
                table: table.to_string(),
                line: *line,
            })
            .collect(),
    }
}

fn route(path: &str, file: &str, is_api_route: bool) -> RouteNode {
    RouteNode {
        id: format!("route:{file}"),
        path: path.to_string(),
        source_file: file.to_string(),
        is_api_route,
        is_page: !is_api_route,
        router: RouterKind::App,
    }
}

fn callsite(kind: CallKind, target: &str, line: u32) -> CallsiteNode {
    CallsiteNode {
        id: format!("callsite:client.ts:{line}:0"),
        call_kind: kind,
        target_path: target.to_string(),
        http_method: None,
        file_path: "client.ts".to_string(),
        line,
    }
}

#[test]
fn registry_order_is_fixed() {
    assert_eq!(
        RuleEngine::new().codes(),
        vec![
            "ENV_NOT_DECLARED",
            "QUERY_NO_PAGINATION",
            "QUERY_SELECT_STAR",
            "MUTATION_WITHOUT_FILTER",
            "TABLE_WITHOUT_RLS",
            "RLS_WITHOUT_POLICY",
            "QUERY_UNKNOWN_TABLE",
            "API_CALL_NO_ROUTE",
            "NAV_TO_MISSING_ROUTE",
            "ENDPOINT_NO_AUTH",
            "ENDPOINT_NO_ERROR_HANDLING",
            "ENDPOINT_NO_VALIDATION",
            "UI_STUB_ACTION",
        ]
    );
}

#[test]
fn query_rules_fire_once_per_node() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lib/queries.ts", SUPABASE_QUERIES);
    let findings = evaluate(&build_graph(dir.path()));

    assert_eq!(lines_for(&findings, "QUERY_NO_PAGINATION"), vec![2, 4]);
    assert_eq!(lines_for(&findings, "QUERY_SELECT_STAR"), vec![2, 4, 6]);
    assert_eq!(lines_for(&findings, "MUTATION_WITHOUT_FILTER"), vec![8]);
    assert!(lines_for(&findings, "QUERY_UNKNOWN_TABLE").is_empty());

    let mutation = findings
        .iter()
        .find(|f| f.code == "MUTATION_WITHOUT_FILTER")
        .unwrap();
    assert_eq!(mutation.severity, Severity::Critical);
    assert_eq!(mutation.category, Category::DataSafety);
    assert_eq!(mutation.related.as_deref(), Some(&["todos".to_string()][..]));
}

#[test]
fn unknown_tables_only_checked_when_migrations_create_tables() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lib/queries.ts", SUPABASE_QUERIES);
    write(
        dir.path(),
        "supabase/migrations/001.sql",
        "create table todos (id int);\nalter table todos enable row level security;\ncreate policy p on todos using (true);\n",
    );
    let findings = evaluate(&build_graph(dir.path()));

    // `profiles` is unknown; the storage bucket is not a table.
    assert_eq!(lines_for(&findings, "QUERY_UNKNOWN_TABLE"), vec![9]);
    assert!(!codes(&findings).contains(&"TABLE_WITHOUT_RLS"));
    assert!(!codes(&findings).contains(&"RLS_WITHOUT_POLICY"));
}

#[test]
fn rls_state_is_replayed_across_migrations() {
    let mut graph = AppGraph::new();
    graph.add(migration(
        "supabase/migrations/001.sql",
        &[
            (StatementKind::CreateTable, "secure", 1),
            (StatementKind::EnableRls, "secure", 2),
            (StatementKind::CreatePolicy, "secure", 3),
            (StatementKind::CreateTable, "open", 4),
            (StatementKind::CreateTable, "flipped", 5),
            (StatementKind::EnableRls, "flipped", 6),
            (StatementKind::CreatePolicy, "flipped", 7),
            (StatementKind::CreateTable, "locked", 8),
            (StatementKind::EnableRls, "locked", 9),
        ],
    ));
    graph.add(migration(
        "supabase/migrations/002.sql",
        &[(StatementKind::DisableRls, "flipped", 1)],
    ));

    let findings = evaluate(&graph);
    let subjects = |code: &str| -> Vec<String> {
        findings
            .iter()
            .filter(|f| f.code == code)
            .flat_map(|f| f.related.clone().unwrap_or_default())
            .collect()
    };
    assert_eq!(subjects("TABLE_WITHOUT_RLS"), vec!["flipped", "open"]);
    assert_eq!(subjects("RLS_WITHOUT_POLICY"), vec!["locked"]);

    let open = findings
        .iter()
        .find(|f| f.related.as_deref() == Some(&["open".to_string()][..]))
        .unwrap();
    let evidence = open.primary_evidence().unwrap();
    assert_eq!(evidence.file_path, "supabase/migrations/001.sql");
    assert_eq!(evidence.line, Some(4));
}

#[test]
fn env_rule_exempts_public_ambient_and_declared() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lib/env.ts", ENV_READS);
    write(dir.path(), "lib/other.ts", "export const again = process.env.SECRET_KEY;\n");
    write(dir.path(), ".env.example", "DECLARED=\n");
    let findings = evaluate(&build_graph(dir.path()));

    let names: Vec<String> = findings
        .iter()
        .filter(|f| f.code == "ENV_NOT_DECLARED")
        .flat_map(|f| f.related.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["DATABASE_URL", "REGION", "SECRET_KEY", "STRIPE_KEY"]);

    let secret = findings
        .iter()
        .find(|f| f.related.as_deref() == Some(&["SECRET_KEY".to_string()][..]))
        .unwrap();
    assert_eq!(secret.evidence.len(), 2);
    assert_eq!(secret.evidence[0].file_path, "lib/env.ts");
    assert_eq!(secret.evidence[1].file_path, "lib/other.ts");
}

#[test]
fn public_prefix_is_exempt_without_example_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "lib/env.ts",
        "export const a = process.env.NEXT_PUBLIC_FOO;\nexport const b = process.env.SECRET_KEY;\n",
    );
    let findings = evaluate(&build_graph(dir.path()));
    let flagged: Vec<String> = findings
        .iter()
        .flat_map(|f| f.related.clone().unwrap_or_default())
        .collect();
    assert_eq!(flagged, vec!["SECRET_KEY"]);
}

#[test]
fn wiring_rules_match_dynamic_segments() {
    let mut graph = AppGraph::new();
    graph.add(route("/api/users/[id]", "app/api/users/[id]/route.ts", true));
    graph.add(route("/", "app/page.tsx", false));
    graph.add(route("/blog/[slug]", "app/blog/[slug]/page.tsx", false));
    graph.add(callsite(CallKind::Fetch, "/api/users/${id}", 1));
    graph.add(callsite(CallKind::Axios, "/api/orders", 2));
    graph.add(callsite(CallKind::Fetch, "https://example.com/api/x", 3));
    graph.add(callsite(CallKind::Router, "/blog/hello?ref=nav", 4));
    graph.add(callsite(CallKind::Router, "/settings", 5));
    graph.add(callsite(CallKind::Fetch, "/api/users/42", 6));

    let findings = evaluate(&graph);
    assert_eq!(lines_for(&findings, "API_CALL_NO_ROUTE"), vec![2]);
    assert_eq!(lines_for(&findings, "NAV_TO_MISSING_ROUTE"), vec![5]);
}

#[test]
fn navigation_rule_abstains_without_page_routes() {
    let mut graph = AppGraph::new();
    graph.add(callsite(CallKind::Router, "/anywhere", 1));
    assert!(evaluate(&graph).is_empty());
}

#[test]
fn endpoint_rules() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "app/api/todos/route.ts",
        r#"export async function GET() {
  return Response.json([]);
}

export async function DELETE(request: Request) {
  const body = await request.json();
  return Response.json(body);
}
"#,
    );
    let findings = evaluate(&build_graph(dir.path()));

    assert_eq!(lines_for(&findings, "ENDPOINT_NO_AUTH"), vec![5]);
    assert_eq!(lines_for(&findings, "ENDPOINT_NO_ERROR_HANDLING"), vec![1, 5]);
    assert_eq!(lines_for(&findings, "ENDPOINT_NO_VALIDATION"), vec![5]);

    let auth = findings.iter().find(|f| f.code == "ENDPOINT_NO_AUTH").unwrap();
    assert!(auth.description.contains("DELETE /api/todos"));
}

#[test]
fn ui_stub_grades() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "components/Toolbar.tsx", TOOLBAR);
    let findings = evaluate(&build_graph(dir.path()));

    let graded: Vec<(u32, Severity, Confidence)> = {
        let mut v: Vec<_> = findings
            .iter()
            .filter(|f| f.code == "UI_STUB_ACTION")
            .map(|f| (f.primary_evidence().unwrap().line.unwrap(), f.severity, f.confidence))
            .collect();
        v.sort_by_key(|g| g.0);
        v
    };
    assert_eq!(
        graded,
        vec![
            (7, Severity::Medium, Confidence::High),
            (8, Severity::Medium, Confidence::Medium),
            (9, Severity::Low, Confidence::Medium),
            (10, Severity::Medium, Confidence::High),
        ]
    );
}

#[test]
fn disabled_rules_and_severity_overrides() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lib/queries.ts", SUPABASE_QUERIES);
    let graph = build_graph(dir.path());

    let config = ShipreadyConfig::from_toml(
        r#"
[rules]
disabled = ["QUERY_SELECT_STAR"]

[rules.severity_overrides]
query_no_pagination = "LOW"
"#,
    )
    .unwrap();
    let findings = RuleEngine::new().evaluate(&graph, &RuleContext { config: &config });

    assert!(!codes(&findings).contains(&"QUERY_SELECT_STAR"));
    assert!(findings
        .iter()
        .filter(|f| f.code == "QUERY_NO_PAGINATION")
        .all(|f| f.severity == Severity::Low));
}

#[test]
fn every_finding_has_evidence_and_stable_ids() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lib/queries.ts", SUPABASE_QUERIES);
    write(dir.path(), "lib/env.ts", ENV_READS);
    write(dir.path(), "components/Toolbar.tsx", TOOLBAR);

    let first = evaluate(&build_graph(dir.path()));
    let second = evaluate(&build_graph(dir.path()));
    assert!(!first.is_empty());
    assert!(first.iter().all(|f| !f.evidence.is_empty()));

    let ids = |fs: &[Finding]| fs.iter().map(|f| f.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));

    let mut unique = ids(&first);
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), first.len());
}

#[test]
fn findings_require_evidence() {
    const INFO: RuleInfo = RuleInfo {
        code: "TEST_RULE",
        category: Category::Config,
        severity: Severity::Low,
        confidence: Confidence::Low,
        title: "test",
        fix_summary: "fix",
        fix_steps: &[],
    };
    assert!(create_finding(&INFO, "nothing", Vec::new()).is_none());

    let finding = create_finding(&INFO, "one", vec![EvidenceRef::at("a.ts", 3)]).unwrap();
    assert_eq!(finding.evidence.len(), 1);
    assert!(!finding.suppressed);
    let json = serde_json::to_value(&finding).unwrap();
    assert!(json.get("suppressed").is_none());
    assert_eq!(json["severity"], "LOW");
    assert_eq!(json["category"], "config");
}
