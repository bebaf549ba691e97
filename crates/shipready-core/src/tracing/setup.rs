//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "SHIPREADY_LOG";

/// Initialize the shipready tracing/logging system.
///
/// Reads `SHIPREADY_LOG` for per-subsystem log levels, e.g.
/// `SHIPREADY_LOG=shipready_analysis::extractors=debug,shipready=info`.
/// Falls back to `shipready=<default_level>` when unset or invalid.
///
/// Output goes to stderr so stdout stays clean for reports. Idempotent.
pub fn init_tracing(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(format!("shipready={default_level}")));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(filter)
            .init();
    });
}
