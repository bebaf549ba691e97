//! Stable error codes surfaced to callers that wrap the CLI.

/// Every error enum implements this to expose a structured code string
/// alongside its human-readable message.
pub trait ShipreadyErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const ROOT_UNREADABLE: &str = "ROOT_UNREADABLE";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const BASELINE_ERROR: &str = "BASELINE_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
