//! Report rendering and writing errors.

use std::path::PathBuf;

use super::error_code::{self, ShipreadyErrorCode};

/// Errors that can occur while rendering or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unknown report format: {0}")]
    UnknownFormat(String),
}

impl ShipreadyErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
