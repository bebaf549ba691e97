//! Shared constants for the shipready scanner.

/// Scanner version string, emitted as `scannerVersion`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scanner name used in report headers.
pub const SCANNER_NAME: &str = "shipready";

/// Version of the `ValidationContext` JSON contract.
/// Bump on any breaking shape change; additive fields do not require a bump.
pub const SCHEMA_VERSION: u32 = 1;

/// Project-level config file name.
pub const CONFIG_FILE_NAME: &str = "shipready.toml";

/// Default report output directory, relative to the project root.
pub const DEFAULT_OUT_DIR: &str = ".shipready";

/// Machine-readable report file name.
pub const JSON_REPORT_FILE: &str = "validation-context.json";

/// Human-readable report file name.
pub const MARKDOWN_REPORT_FILE: &str = "validation-context.md";

/// Conventional baseline file name in the project root.
pub const BASELINE_FILE_NAME: &str = "validation-baseline.json";

/// Target project compiler configuration.
pub const TSCONFIG_FILE_NAME: &str = "tsconfig.json";

/// Maximum file size in bytes for indexing (default: 1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Default number of parse threads (0 = auto-detect).
pub const DEFAULT_THREADS: usize = 0;

/// Share of a file that may be covered by ERROR nodes before it is skipped.
/// `0.0` skips any file with a syntax error.
pub const DEFAULT_MAX_ERROR_RATIO: f64 = 0.0;

/// Default severity at or above which the CLI exits non-zero.
pub const DEFAULT_FAIL_ON: &str = "CRITICAL";

/// Accepted `fail_on` values, highest first.
pub const SEVERITY_LEVELS: [&str; 4] = ["CRITICAL", "HIGH", "MEDIUM", "LOW"];

/// Default report formats.
pub const DEFAULT_FORMATS: [&str; 2] = ["json", "md"];

/// Known report formats.
pub const KNOWN_FORMATS: [&str; 3] = ["json", "md", "console"];

/// Default include globs, matched against `/`-separated relative paths.
pub const DEFAULT_INCLUDE_GLOBS: [&str; 7] = [
    "**/*.ts",
    "**/*.tsx",
    "**/*.js",
    "**/*.jsx",
    "**/*.mjs",
    "**/*.cjs",
    "**/migrations/**/*.sql",
];

/// Directory names never descended into.
pub const DEFAULT_EXCLUDE_DIRS: [&str; 9] = [
    "node_modules",
    ".next",
    ".git",
    "dist",
    "build",
    "out",
    "coverage",
    ".turbo",
    ".vercel",
];

/// Relative path prefixes where the scanner itself lives when vendored in-repo.
pub const SELF_EXCLUDE_PATHS: [&str; 2] = ["tools/shipready", ".shipready"];

/// Inline suppression marker recognised in source comments.
pub const INLINE_SUPPRESSION_MARKER: &str = "shipready-ignore";

/// Env var prefixes that are safe to expose to the browser.
pub const PUBLIC_ENV_PREFIXES: [&str; 6] = [
    "NEXT_PUBLIC_",
    "VITE_",
    "REACT_APP_",
    "EXPO_PUBLIC_",
    "PUBLIC_",
    "GATSBY_",
];

/// Env vars injected by the runtime or platform, never expected in `.env.example`.
pub const AMBIENT_ENV_VARS: [&str; 8] = [
    "NODE_ENV",
    "CI",
    "PORT",
    "VERCEL",
    "VERCEL_ENV",
    "VERCEL_URL",
    "NEXT_RUNTIME",
    "TZ",
];

/// Candidate env declaration files, checked in order.
pub const ENV_EXAMPLE_FILES: [&str; 4] = [
    ".env.example",
    ".env.sample",
    ".env.template",
    ".env.local.example",
];
