//! Error handling for shipready.
//! One error enum per subsystem, `thiserror` only.

pub mod baseline_error;
pub mod config_error;
pub mod error_code;
pub mod pipeline_error;
pub mod report_error;
pub mod scan_error;

pub use baseline_error::BaselineError;
pub use config_error::ConfigError;
pub use error_code::ShipreadyErrorCode;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use report_error::ReportError;
pub use scan_error::ScanError;
