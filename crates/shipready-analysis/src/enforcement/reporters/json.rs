//! JSON reporter — the schema-versioned machine contract.

use shipready_core::constants::JSON_REPORT_FILE;
use shipready_core::errors::ReportError;

use super::Reporter;
use crate::enforcement::context::ValidationContext;

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn file_name(&self) -> Option<&'static str> {
        Some(JSON_REPORT_FILE)
    }

    fn render(&self, context: &ValidationContext) -> Result<String, ReportError> {
        let mut rendered = serde_json::to_string_pretty(context)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;
        rendered.push('\n');
        Ok(rendered)
    }
}
