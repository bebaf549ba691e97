//! Pipeline errors and non-fatal error collection.

use super::error_code::ShipreadyErrorCode;
use super::{BaselineError, ConfigError, ReportError, ScanError};

/// Fatal errors that abort a scan run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Baseline error: {0}")]
    Baseline(#[from] BaselineError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl ShipreadyErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Baseline(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
        }
    }
}

/// Result of a pipeline phase that accumulates non-fatal errors.
/// Allows partial results to be returned even when some files fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the phase.
    pub errors: Vec<ScanError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new pipeline result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: ScanError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
