//! Core types for findings.

use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Finding severity, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn parse(raw: &str) -> Option<Severity> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Highest first.
    pub fn descending() -> [Severity; 4] {
        [Self::Critical, Self::High, Self::Medium, Self::Low]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Finding category; one ship-checklist item per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Security,
    DataSafety,
    Wiring,
    Reliability,
    Performance,
    Config,
    Ui,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Self::Security,
            Self::DataSafety,
            Self::Wiring,
            Self::Reliability,
            Self::Performance,
            Self::Config,
            Self::Ui,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::DataSafety => "data-safety",
            Self::Wiring => "wiring",
            Self::Reliability => "reliability",
            Self::Performance => "performance",
            Self::Config => "config",
            Self::Ui => "ui",
        }
    }

    /// Human label for checklists.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Security => "Access control and row-level security",
            Self::DataSafety => "Data safety",
            Self::Wiring => "API and navigation wiring",
            Self::Reliability => "Error handling",
            Self::Performance => "Query performance",
            Self::Config => "Environment configuration",
            Self::Ui => "UI actions wired up",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A source location backing a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRef {
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EvidenceRef {
    pub fn at(file_path: impl Into<String>, line: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line: Some(line),
            end_line: None,
            snippet: None,
            reason: None,
        }
    }

    pub fn with_snippet(mut self, snippet: Option<String>) -> Self {
        self.snippet = snippet.filter(|s| !s.is_empty());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedFix {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
}

/// Fixed metadata of one rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleInfo {
    pub code: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub confidence: Confidence,
    pub title: &'static str,
    pub fix_summary: &'static str,
    pub fix_steps: &'static [&'static str],
}

impl RuleInfo {
    pub fn recommended_fix(&self) -> RecommendedFix {
        RecommendedFix {
            summary: self.fix_summary.to_string(),
            steps: self.fix_steps.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A rule-detected gap.
///
/// Outside this crate the only way to build one is [`Finding::new`], which
/// refuses empty evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Finding {
    /// Hash of the code and the primary evidence location.
    pub id: String,
    pub code: String,
    pub category: Category,
    pub severity: Severity,
    pub confidence: Confidence,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<String>>,
    pub evidence: Vec<EvidenceRef>,
    pub recommended_fix: RecommendedFix,
    #[serde(default, skip_serializing_if = "is_false")]
    pub suppressed: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Finding {
    /// Build a finding from rule metadata. Returns `None` when `evidence`
    /// is empty.
    pub fn new(info: &RuleInfo, description: impl Into<String>, evidence: Vec<EvidenceRef>) -> Option<Finding> {
        let primary = evidence.first()?;
        let id = finding_id(info.code, primary, None);
        Some(Finding {
            id,
            code: info.code.to_string(),
            category: info.category,
            severity: info.severity,
            confidence: info.confidence,
            title: info.title.to_string(),
            description: description.into(),
            related: None,
            evidence,
            recommended_fix: info.recommended_fix(),
            suppressed: false,
        })
    }

    /// Attach related subjects (table names, variable names). The first one
    /// also feeds the id, so findings sharing a location stay distinct.
    pub fn with_related(mut self, related: Vec<String>) -> Self {
        if let (Some(primary), Some(subject)) = (self.evidence.first(), related.first()) {
            self.id = finding_id(&self.code, primary, Some(subject));
        }
        self.related = Some(related).filter(|r| !r.is_empty());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn primary_evidence(&self) -> Option<&EvidenceRef> {
        self.evidence.first()
    }

    pub fn mark_suppressed(&mut self) {
        self.suppressed = true;
    }

    /// Unsuppressed and at or above `threshold`.
    pub fn is_open_at(&self, threshold: Severity) -> bool {
        !self.suppressed && self.severity >= threshold
    }
}

/// Free-function form of [`Finding::new`].
pub fn create_finding(info: &RuleInfo, description: impl Into<String>, evidence: Vec<EvidenceRef>) -> Option<Finding> {
    Finding::new(info, description, evidence)
}

fn finding_id(code: &str, primary: &EvidenceRef, subject: Option<&str>) -> String {
    let key = format!(
        "{}|{}|{}|{}",
        code,
        primary.file_path,
        primary.line.map(|l| l.to_string()).unwrap_or_default(),
        subject.unwrap_or("")
    );
    format!("{:016x}", xxh3_64(key.as_bytes()))
}
