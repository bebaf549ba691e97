//! Inline suppression — `shipready-ignore` comments.

use rustc_hash::FxHashMap;
use shipready_core::constants::INLINE_SUPPRESSION_MARKER;

use crate::enforcement::rules::Finding;

const COMMENT_OPENERS: &[&str] = &["//", "/*", "{/*", "--", "#"];

/// Checks whether findings are suppressed by a comment on the evidence line
/// or the line directly above it.
///
/// Supports:
/// - `// shipready-ignore` — every rule
/// - `// shipready-ignore UI_STUB_ACTION, ENV_NOT_DECLARED` — listed rules
/// - `// eslint-disable-next-line shipready/UI_STUB_ACTION` — listed rules only
/// - `-- shipready-ignore TABLE_WITHOUT_RLS` in SQL
pub struct InlineSuppressor;

impl InlineSuppressor {
    pub fn new() -> Self {
        Self
    }

    /// `source_lines` maps relative path → file lines.
    pub fn is_suppressed(
        &self,
        finding: &Finding,
        source_lines: &FxHashMap<String, Vec<String>>,
    ) -> bool {
        let Some(primary) = finding.primary_evidence() else {
            return false;
        };
        let (Some(lines), Some(line)) = (source_lines.get(&primary.file_path), primary.line) else {
            return false;
        };
        if line == 0 {
            return false;
        }
        let idx = (line - 1) as usize;

        if lines
            .get(idx)
            .is_some_and(|l| self.check_marker(l, &finding.code).unwrap_or(false))
        {
            return true;
        }
        idx > 0
            && lines
                .get(idx - 1)
                .is_some_and(|l| self.line_suppresses(l, &finding.code))
    }

    /// Mark suppressed findings; returns how many were newly marked.
    pub fn apply(&self, findings: &mut [Finding], source_lines: &FxHashMap<String, Vec<String>>) -> usize {
        let mut marked = 0;
        for finding in findings.iter_mut().filter(|f| !f.suppressed) {
            if self.is_suppressed(finding, source_lines) {
                finding.mark_suppressed();
                marked += 1;
            }
        }
        marked
    }

    /// Directives accepted on the line above the evidence. The line must be a
    /// comment on its own; a trailing comment covers only its own statement.
    fn line_suppresses(&self, line: &str, code: &str) -> bool {
        let trimmed = line.trim();
        if !COMMENT_OPENERS.iter().any(|opener| trimmed.starts_with(opener)) {
            return false;
        }
        if let Some(result) = self.check_marker(trimmed, code) {
            return result;
        }
        self.check_eslint_disable(trimmed, code).unwrap_or(false)
    }

    /// `shipready-ignore [CODES]` inside a comment.
    fn check_marker(&self, line: &str, code: &str) -> Option<bool> {
        let pos = line.find(INLINE_SUPPRESSION_MARKER)?;
        let before = &line[..pos];
        let is_comment = before.contains("//")
            || before.contains("/*")
            || before.contains("--")
            || before.contains('#')
            || before.contains("{/*");
        if !is_comment {
            return None;
        }

        let after = line[pos + INLINE_SUPPRESSION_MARKER.len()..]
            .trim()
            .trim_end_matches("*/}")
            .trim_end_matches("*/")
            .trim();
        if after.is_empty() {
            return Some(true);
        }
        Some(codes_contain(after, code))
    }

    /// `eslint-disable-next-line` listing the code (optionally `shipready/CODE`).
    fn check_eslint_disable(&self, line: &str, code: &str) -> Option<bool> {
        let marker = "eslint-disable-next-line";
        let pos = line.find(marker)?;
        let before = &line[..pos];
        if !before.contains("//") && !before.contains("/*") {
            return None;
        }
        let after = line[pos + marker.len()..].trim().trim_end_matches("*/").trim();
        Some(codes_contain(after, code))
    }
}

impl Default for InlineSuppressor {
    fn default() -> Self {
        Self::new()
    }
}

/// `A, B -- reason` / `A B` → does the list include `code`?
fn codes_contain(list: &str, code: &str) -> bool {
    let list = list.split("--").next().unwrap_or(list);
    list.split([',', ' '])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.strip_prefix("shipready/").unwrap_or(s))
        .any(|s| s.eq_ignore_ascii_case(code))
}
