//! Reporters — output formats for a `ValidationContext`.
//!
//! JSON (machine contract), Markdown (human digest), console (terminal
//! summary). Reporters only format; all analysis is done beforehand.

pub mod console;
pub mod json;
pub mod markdown;

use std::path::{Path, PathBuf};

use shipready_core::errors::ReportError;

use crate::enforcement::context::ValidationContext;

/// Trait for report generation.
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Output file name inside the report directory; `None` for reporters
    /// that print instead of writing a file.
    fn file_name(&self) -> Option<&'static str>;

    fn render(&self, context: &ValidationContext) -> Result<String, ReportError>;
}

/// Create a reporter by format name.
pub fn create_reporter(format: &str) -> Option<Box<dyn Reporter>> {
    match format.trim().to_ascii_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonReporter)),
        "md" | "markdown" => Some(Box::new(markdown::MarkdownReporter::new())),
        "console" => Some(Box::new(console::ConsoleReporter::default())),
        _ => None,
    }
}

/// List all available reporter format names.
pub fn available_formats() -> &'static [&'static str] {
    &["json", "md", "console"]
}

/// Render `context` and write it under `out_dir`, creating the directory if
/// missing. Returns the written path, or `None` for non-file reporters.
pub fn write_report(
    reporter: &dyn Reporter,
    context: &ValidationContext,
    out_dir: &Path,
) -> Result<Option<PathBuf>, ReportError> {
    let Some(file_name) = reporter.file_name() else {
        return Ok(None);
    };
    let rendered = reporter.render(context)?;
    std::fs::create_dir_all(out_dir).map_err(|source| ReportError::WriteFailed {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(file_name);
    std::fs::write(&path, rendered).map_err(|source| ReportError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(reporter = reporter.name(), path = %path.display(), "report written");
    Ok(Some(path))
}
