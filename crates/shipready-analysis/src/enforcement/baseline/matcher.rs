//! Baseline entry ↔ finding matching.

use glob::{MatchOptions, Pattern};

use super::types::{BaselineEntry, ValidationBaseline};
use crate::enforcement::rules::Finding;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// How an entry's `filePath` is compared to evidence paths.
#[derive(Debug, Clone)]
enum PathMatch {
    Any,
    Substring(String),
    Glob(Pattern),
}

impl PathMatch {
    fn new(raw: Option<&str>) -> PathMatch {
        let Some(raw) = raw.map(|r| r.replace('\\', "/")).filter(|r| !r.is_empty()) else {
            return PathMatch::Any;
        };
        if raw.contains(['*', '?', '[']) {
            match Pattern::new(&raw) {
                Ok(pattern) => return PathMatch::Glob(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %raw, error = %e, "invalid baseline glob, matching as substring");
                }
            }
        }
        PathMatch::Substring(raw)
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Any => true,
            PathMatch::Substring(s) => path.contains(s.as_str()),
            PathMatch::Glob(p) => p.matches_with(path, GLOB_OPTIONS),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledEntry {
    entry: BaselineEntry,
    path: PathMatch,
}

impl CompiledEntry {
    fn matches(&self, finding: &Finding) -> bool {
        if self.entry.rule_id != finding.code {
            return false;
        }
        if self
            .entry
            .gap_id
            .as_deref()
            .is_some_and(|gap| gap != finding.id)
        {
            return false;
        }
        // Path and line must hold on the same evidence entry.
        finding.evidence.iter().any(|ev| {
            self.path.matches(&ev.file_path)
                && self.entry.line.map_or(true, |line| ev.line == Some(line))
        })
    }
}

/// Pre-compiled baseline.
#[derive(Debug, Clone, Default)]
pub struct BaselineMatcher {
    entries: Vec<CompiledEntry>,
}

impl BaselineMatcher {
    pub fn new(baseline: &ValidationBaseline) -> Self {
        Self {
            entries: baseline
                .suppress
                .iter()
                .map(|entry| CompiledEntry {
                    path: PathMatch::new(entry.file_path.as_deref()),
                    entry: entry.clone(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matches(&self, finding: &Finding) -> bool {
        self.entries.iter().any(|e| e.matches(finding))
    }

    /// Mark matching findings suppressed; returns how many were newly marked.
    pub fn apply(&self, findings: &mut [Finding]) -> usize {
        let mut marked = 0;
        for finding in findings.iter_mut().filter(|f| !f.suppressed) {
            if self.matches(finding) {
                finding.mark_suppressed();
                marked += 1;
            }
        }
        marked
    }
}
