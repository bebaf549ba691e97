//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use shipready_analysis::enforcement::rules::{Finding, RuleContext, RuleEngine};
use shipready_analysis::extractors::{ExtractionContext, ExtractorRegistry};
use shipready_analysis::graph::AppGraph;
use shipready_analysis::project::SourceProject;
use shipready_analysis::scanner::FileIndexer;
use shipready_core::config::ShipreadyConfig;

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Index, parse and extract `root` with `config`.
pub fn build_graph_with(root: &Path, config: &ShipreadyConfig) -> AppGraph {
    let catalog = FileIndexer::new(root, &config.scan).index().unwrap().data;
    let project = SourceProject::build(root, &catalog.entries, &config.scan).data;
    let mut graph = AppGraph::new();
    let ctx = ExtractionContext {
        files: &catalog.entries,
        project: &project,
        project_root: root,
        config,
    };
    ExtractorRegistry::new().run(&mut graph, &ctx);
    graph
}

pub fn build_graph(root: &Path) -> AppGraph {
    build_graph_with(root, &ShipreadyConfig::default())
}

pub fn evaluate(graph: &AppGraph) -> Vec<Finding> {
    let config = ShipreadyConfig::default();
    RuleEngine::new().evaluate(graph, &RuleContext { config: &config })
}

pub fn codes(findings: &[Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.code.as_str()).collect()
}

/// Lines of the primary evidence of every finding with `code`.
pub fn lines_for(findings: &[Finding], code: &str) -> Vec<u32> {
    let mut lines: Vec<u32> = findings
        .iter()
        .filter(|f| f.code == code)
        .filter_map(|f| f.primary_evidence().and_then(|e| e.line))
        .collect();
    lines.sort_unstable();
    lines
}

pub const SUPABASE_QUERIES: &str = r#"export async function load(supabase: any, file: Blob) {
  const a = await supabase.from('todos').select('*');
  const b = await supabase.from('todos').select('id,name').range(0, 9);
  const c = await supabase.from('todos').select();
  const d = await supabase.from('todos').select('id').eq('id', 1).single();
  const e = await supabase.from('todos').select('*', { count: 'exact', head: true });
  await supabase.from('todos').update({ done: true }).eq('id', 1);
  await supabase.from('todos').delete();
  await supabase.from('profiles').upsert({ id: 1 });
  await supabase.storage.from('avatars').upload('a.png', file);
  const letters = Array.from('abc');
  return [a, b, c, d, e, letters];
}
"#;

pub const ENV_READS: &str = r#"export const secret = process.env.SECRET_KEY;
export const db = process.env['DATABASE_URL'];
export const pub = process.env.NEXT_PUBLIC_FOO;
export const port = process.env.PORT ?? '3000';
const { STRIPE_KEY, REGION = 'us' } = process.env;
export const mode = import.meta.env.VITE_MODE;
export const declared = process.env.DECLARED || 'x';
export { STRIPE_KEY, REGION };
"#;

pub const TOOLBAR: &str = r##"export function Toolbar() {
  function handleSubmit(e) {
    // TODO: wire to API
  }
  return (
    <div>
      <button onClick={() => {}}>Empty</button>
      <button onClick={() => console.log('clicked')}>Log</button>
      <Link href="#">Placeholder</Link>
      <form onSubmit={handleSubmit}></form>
      <button onClick={() => save()}>Real</button>
      <a href="/docs">Docs</a>
    </div>
  );
}
"##;
