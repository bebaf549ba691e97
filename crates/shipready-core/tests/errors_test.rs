//! Tests for error codes and conversions.

use std::path::PathBuf;

use shipready_core::errors::*;

#[test]
fn test_scan_error_codes() {
    let root = ScanError::RootUnreadable {
        path: PathBuf::from("/nope"),
    };
    assert_eq!(root.error_code(), "ROOT_UNREADABLE");
    assert!(root.coded_string().starts_with("[ROOT_UNREADABLE] "));

    let parse = ScanError::ParseFailed {
        path: PathBuf::from("app/page.tsx"),
        message: "no tree".to_string(),
    };
    assert_eq!(parse.error_code(), "PARSE_ERROR");

    let io = ScanError::IoError {
        path: PathBuf::from("a.ts"),
        source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
    };
    assert_eq!(io.error_code(), "SCAN_ERROR");
}

#[test]
fn test_pipeline_error_preserves_subsystem_code() {
    let err: PipelineError = ConfigError::ValidationFailed {
        field: "report.fail_on".to_string(),
        message: "bad".to_string(),
    }
    .into();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("report.fail_on"));

    let err: PipelineError = BaselineError::ParseError {
        path: "validation-baseline.json".to_string(),
        message: "expected value".to_string(),
    }
    .into();
    assert_eq!(err.error_code(), "BASELINE_ERROR");

    let err: PipelineError = ReportError::UnknownFormat("pdf".to_string()).into();
    assert_eq!(err.coded_string(), "[REPORT_ERROR] Report error: Unknown report format: pdf");
}

#[test]
fn test_pipeline_result_collects_non_fatal_errors() {
    let mut result: PipelineResult<Vec<u32>> = PipelineResult::new(vec![1, 2]);
    assert!(result.is_clean());
    result.add_error(ScanError::NotUtf8 {
        path: PathBuf::from("bin.js"),
    });
    assert!(!result.is_clean());
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.data, vec![1, 2]);
}
