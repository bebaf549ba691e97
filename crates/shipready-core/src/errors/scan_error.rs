//! Indexing and parsing errors.

use std::path::PathBuf;

use super::error_code::{self, ShipreadyErrorCode};

/// Errors raised while cataloguing or parsing the project tree.
///
/// `RootUnreadable` is fatal. The per-file variants are collected as
/// non-fatal errors and never abort a scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Project root is not a readable directory: {path}")]
    RootUnreadable { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid include glob {pattern}: {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("File is not valid UTF-8: {path}")]
    NotUtf8 { path: PathBuf },

    #[error("Failed to parse {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    #[error("File too large: {path} ({size} bytes, max {max})")]
    MaxFileSizeExceeded { path: PathBuf, size: u64, max: u64 },
}

impl ShipreadyErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RootUnreadable { .. } => error_code::ROOT_UNREADABLE,
            Self::NotUtf8 { .. } | Self::ParseFailed { .. } => error_code::PARSE_ERROR,
            _ => error_code::SCAN_ERROR,
        }
    }
}
