//! Tests for the tracing setup.

use std::sync::Mutex;

use shipready_core::tracing::setup::{init_tracing, LOG_ENV_VAR};

/// Serializes tracing tests (env var manipulation).
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_custom_filter_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var(LOG_ENV_VAR, "shipready_analysis::extractors=debug,shipready=warn");
    init_tracing("info");
    std::env::remove_var(LOG_ENV_VAR);
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing("info");
    init_tracing("warn");
    init_tracing("debug");
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var(LOG_ENV_VAR, "=#=not a filter=#=");
    init_tracing("info");
    std::env::remove_var(LOG_ENV_VAR);
}
