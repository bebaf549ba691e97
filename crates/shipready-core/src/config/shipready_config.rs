//! Top-level shipready configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{EnvConfig, ReportConfig, RulesConfig, ScanConfig};
use crate::constants::{CONFIG_FILE_NAME, KNOWN_FORMATS, SEVERITY_LEVELS};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`SHIPREADY_*`)
/// 3. Project config (`shipready.toml` in the project root, or an explicit path)
/// 4. User config (`~/.shipready/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShipreadyConfig {
    pub scan: ScanConfig,
    pub env: EnvConfig,
    pub rules: RulesConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub out_dir: Option<String>,
    pub formats: Option<Vec<String>>,
    pub fail_on: Option<String>,
    pub baseline: Option<String>,
    pub threads: Option<usize>,
}

impl ShipreadyConfig {
    /// Load configuration with layered resolution.
    ///
    /// `config_path` replaces the project-root `shipready.toml` lookup; an
    /// explicit path that does not exist is an error.
    pub fn load(
        root: &Path,
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let project_config_path = root.join(CONFIG_FILE_NAME);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ShipreadyConfig) -> Result<(), ConfigError> {
        if let Some(ref fail_on) = config.report.fail_on {
            if !is_severity_level(fail_on) {
                return Err(ConfigError::ValidationFailed {
                    field: "report.fail_on".to_string(),
                    message: format!("must be one of {}", SEVERITY_LEVELS.join(", ")),
                });
            }
        }
        for format in &config.report.formats {
            if !KNOWN_FORMATS.contains(&format.to_ascii_lowercase().as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "report.formats".to_string(),
                    message: format!("unknown format '{format}'"),
                });
            }
        }
        for (code, severity) in &config.rules.severity_overrides {
            if !is_severity_level(severity) {
                return Err(ConfigError::ValidationFailed {
                    field: format!("rules.severity_overrides.{code}"),
                    message: format!("must be one of {}", SEVERITY_LEVELS.join(", ")),
                });
            }
        }
        if let Some(ratio) = config.scan.max_error_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::ValidationFailed {
                    field: "scan.max_error_ratio".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if let Some(max_file_size) = config.scan.max_file_size {
            if max_file_size == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "scan.max_file_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolve the output directory against the project root.
    pub fn resolve_out_dir(&self, root: &Path) -> PathBuf {
        resolve_against(root, self.report.effective_out_dir())
    }

    /// Resolve the configured baseline path against the project root.
    pub fn resolve_baseline(&self, root: &Path) -> Option<PathBuf> {
        self.report
            .baseline
            .as_deref()
            .map(|b| resolve_against(root, b))
    }

    /// Returns the user config path: `~/.shipready/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ShipreadyConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ShipreadyConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it is set.
    fn merge(base: &mut ShipreadyConfig, other: &ShipreadyConfig) {
        // Scan
        if !other.scan.include.is_empty() {
            base.scan.include = other.scan.include.clone();
        }
        if !other.scan.exclude_dirs.is_empty() {
            base.scan.exclude_dirs = other.scan.exclude_dirs.clone();
        }
        if !other.scan.exclude_paths.is_empty() {
            base.scan.exclude_paths = other.scan.exclude_paths.clone();
        }
        if other.scan.respect_gitignore.is_some() {
            base.scan.respect_gitignore = other.scan.respect_gitignore;
        }
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.max_error_ratio.is_some() {
            base.scan.max_error_ratio = other.scan.max_error_ratio;
        }
        if other.scan.use_tsconfig.is_some() {
            base.scan.use_tsconfig = other.scan.use_tsconfig;
        }

        // Env
        if !other.env.public_prefixes.is_empty() {
            base.env.public_prefixes = other.env.public_prefixes.clone();
        }
        if !other.env.ignore.is_empty() {
            base.env.ignore = other.env.ignore.clone();
        }
        if !other.env.example_files.is_empty() {
            base.env.example_files = other.env.example_files.clone();
        }

        // Rules
        if !other.rules.disabled.is_empty() {
            base.rules.disabled = other.rules.disabled.clone();
        }
        for (code, severity) in &other.rules.severity_overrides {
            base.rules
                .severity_overrides
                .insert(code.clone(), severity.clone());
        }

        // Report
        if !other.report.formats.is_empty() {
            base.report.formats = other.report.formats.clone();
        }
        if other.report.out_dir.is_some() {
            base.report.out_dir = other.report.out_dir.clone();
        }
        if other.report.fail_on.is_some() {
            base.report.fail_on = other.report.fail_on.clone();
        }
        if other.report.baseline.is_some() {
            base.report.baseline = other.report.baseline.clone();
        }
        if other.report.inline_suppression.is_some() {
            base.report.inline_suppression = other.report.inline_suppression;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `SHIPREADY_SCAN_MAX_FILE_SIZE`, `SHIPREADY_REPORT_FAIL_ON`, etc.
    fn apply_env_overrides(config: &mut ShipreadyConfig) {
        if let Ok(val) = std::env::var("SHIPREADY_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SHIPREADY_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SHIPREADY_REPORT_FAIL_ON") {
            config.report.fail_on = Some(val.to_ascii_uppercase());
        }
        if let Ok(val) = std::env::var("SHIPREADY_REPORT_FORMATS") {
            config.report.formats = split_list(&val);
        }
        if let Ok(val) = std::env::var("SHIPREADY_REPORT_OUT_DIR") {
            config.report.out_dir = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ShipreadyConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.out_dir {
            config.report.out_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.formats {
            config.report.formats = v.clone();
        }
        if let Some(ref v) = cli.fail_on {
            config.report.fail_on = Some(v.to_ascii_uppercase());
        }
        if let Some(ref v) = cli.baseline {
            config.report.baseline = Some(v.clone());
        }
        if let Some(v) = cli.threads {
            config.scan.threads = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Whether `value` names a severity level (case-insensitive).
pub fn is_severity_level(value: &str) -> bool {
    SEVERITY_LEVELS
        .iter()
        .any(|level| level.eq_ignore_ascii_case(value))
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn resolve_against(root: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

/// Returns the user-level config directory: `~/.shipready/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".shipready"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
