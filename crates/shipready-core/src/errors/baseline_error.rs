//! Baseline file errors.

use super::error_code::{self, ShipreadyErrorCode};

/// Errors that can occur while loading an accepted-gaps baseline.
#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("Baseline file unreadable: {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Baseline parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Baseline entry {index} is invalid: {message}")]
    InvalidEntry { index: usize, message: String },
}

impl ShipreadyErrorCode for BaselineError {
    fn error_code(&self) -> &'static str {
        error_code::BASELINE_ERROR
    }
}
