//! SQL migrations: tables and row-level-security statements.

use std::sync::LazyLock;

use regex::Regex;

use crate::graph::{AppGraph, MigrationNode, MigrationStatement, NodeKind, StatementKind};

use super::{ExtractionContext, Extractor};

const NAME: &str = r#"((?:"[^"]+"|[A-Za-z_][\w$]*)(?:\s*\.\s*(?:"[^"]+"|[A-Za-z_][\w$]*))?)"#;

static CREATE_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bcreate\s+(?:(?:global\s+|local\s+)?(?:temporary|temp|unlogged)\s+)?table\s+(?:if\s+not\s+exists\s+)?{NAME}"
    ))
    .unwrap()
});

static ALTER_RLS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\balter\s+table\s+(?:if\s+exists\s+)?(?:only\s+)?{NAME}\s+(enable|disable)\s+row\s+level\s+security"
    ))
    .unwrap()
});

static CREATE_POLICY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?i)\bcreate\s+policy\s+(?:"[^"]*"|[\w$]+)\s+on\s+(?:table\s+)?{NAME}"#
    ))
    .unwrap()
});

/// Blank out `--` line comments and `/* */` block comments, keeping line
/// breaks so offsets still map to the original lines.
pub fn strip_sql_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\'' {
                in_string = false;
            }
            continue;
        }
        match c {
            '\'' => {
                in_string = true;
                out.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Unquote, lower-case, and drop a `public.` schema prefix.
pub fn normalize_table_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '"' && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    cleaned
        .strip_prefix("public.")
        .map(str::to_string)
        .unwrap_or(cleaned)
}

/// Scan migration text for table and RLS statements, in source order.
pub fn scan_migration(sql: &str) -> Vec<MigrationStatement> {
    let text = strip_sql_comments(sql);
    let line_at = |offset: usize| text[..offset].matches('\n').count() as u32 + 1;
    let mut statements = Vec::new();

    for caps in CREATE_TABLE_RE.captures_iter(&text) {
        if let (Some(all), Some(name)) = (caps.get(0), caps.get(1)) {
            statements.push(MigrationStatement {
                kind: StatementKind::CreateTable,
                table: normalize_table_name(name.as_str()),
                line: line_at(all.start()),
            });
        }
    }
    for caps in ALTER_RLS_RE.captures_iter(&text) {
        if let (Some(all), Some(name), Some(toggle)) = (caps.get(0), caps.get(1), caps.get(2)) {
            let kind = if toggle.as_str().eq_ignore_ascii_case("enable") {
                StatementKind::EnableRls
            } else {
                StatementKind::DisableRls
            };
            statements.push(MigrationStatement {
                kind,
                table: normalize_table_name(name.as_str()),
                line: line_at(all.start()),
            });
        }
    }
    for caps in CREATE_POLICY_RE.captures_iter(&text) {
        if let (Some(all), Some(name)) = (caps.get(0), caps.get(1)) {
            statements.push(MigrationStatement {
                kind: StatementKind::CreatePolicy,
                table: normalize_table_name(name.as_str()),
                line: line_at(all.start()),
            });
        }
    }

    statements.sort_by_key(|s| s.line);
    statements
}

pub struct MigrationsExtractor;

impl Extractor for MigrationsExtractor {
    fn name(&self) -> &'static str {
        "migrations"
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Migration
    }

    fn extract(&self, graph: &mut AppGraph, ctx: &ExtractionContext<'_>) {
        for entry in ctx.migration_files() {
            let sql = match std::fs::read_to_string(&entry.file_path) {
                Ok(sql) => sql,
                Err(e) => {
                    tracing::debug!(file = %entry.relative_path, error = %e, "skipping unreadable migration");
                    continue;
                }
            };
            graph.add(MigrationNode {
                id: format!("migration:{}", entry.relative_path),
                file_path: entry.relative_path.clone(),
                statements: scan_migration(&sql),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_tables_rls_and_policies() {
        let sql = r#"
-- create table ignored_in_comment (id int);
create table if not exists public."Profiles" (id uuid primary key);
CREATE TABLE orders (id int);
alter table only public.profiles enable row level security;
/* alter table orders enable row level security; */
create policy "owner can read" on public.profiles for select using (true);
ALTER TABLE orders DISABLE ROW LEVEL SECURITY;
"#;
        let statements = scan_migration(sql);
        let summary: Vec<(StatementKind, &str, u32)> = statements
            .iter()
            .map(|s| (s.kind, s.table.as_str(), s.line))
            .collect();
        assert_eq!(
            summary,
            vec![
                (StatementKind::CreateTable, "profiles", 3),
                (StatementKind::CreateTable, "orders", 4),
                (StatementKind::EnableRls, "profiles", 5),
                (StatementKind::CreatePolicy, "profiles", 7),
                (StatementKind::DisableRls, "orders", 8),
            ]
        );
    }
}
