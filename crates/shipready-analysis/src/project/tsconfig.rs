//! Target `tsconfig.json` reading (JSONC tolerant).

use std::path::Path;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use shipready_core::constants::TSCONFIG_FILE_NAME;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    pub jsx: Option<String>,
    /// Recorded only. JS files are parsed regardless.
    pub allow_js: Option<bool>,
    pub base_url: Option<String>,
}

/// The subset of `tsconfig.json` the scanner honors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TsConfig {
    pub compiler_options: CompilerOptions,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    #[serde(skip)]
    exclude_patterns: Vec<Pattern>,
}

impl TsConfig {
    /// Read `<root>/tsconfig.json`. Returns `None` when absent; a malformed
    /// file yields the default options.
    pub fn load(root: &Path) -> Option<TsConfig> {
        let path = root.join(TSCONFIG_FILE_NAME);
        if !path.is_file() {
            return None;
        }
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => match TsConfig::parse(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "malformed tsconfig, using defaults");
                    TsConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable tsconfig, using defaults");
                TsConfig::default()
            }
        };
        Some(config)
    }

    /// Parse tsconfig text. Comments and trailing commas are accepted.
    pub fn parse(content: &str) -> Result<TsConfig, serde_json::Error> {
        let mut config: TsConfig = serde_json::from_str(&strip_jsonc(content))?;
        config.exclude_patterns = config
            .exclude
            .iter()
            .flat_map(|raw| {
                let trimmed = raw.trim_start_matches("./").trim_end_matches('/');
                [trimmed.to_string(), format!("{trimmed}/**")]
            })
            .filter_map(|raw| Pattern::new(&raw).ok())
            .collect();
        Ok(config)
    }

    /// Whether a relative path is dropped by `exclude`.
    pub fn excludes(&self, relative_path: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|p| p.matches_with(relative_path, GLOB_OPTIONS))
    }

    pub fn allow_js(&self) -> bool {
        self.compiler_options.allow_js.unwrap_or(false)
    }
}

/// Remove `//` and `/* */` comments and trailing commas, leaving string
/// contents untouched.
pub fn strip_jsonc(input: &str) -> String {
    strip_trailing_commas(&strip_comments(input))
}

fn strip_comments(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match (c, chars.get(i + 1)) {
            ('"', _) => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_and_trailing_commas() {
        let raw = r#"{
            // line
            "compilerOptions": { "allowJs": false, /* block */ },
            "exclude": ["legacy", "a//b",],
        }"#;
        let config = TsConfig::parse(raw).unwrap();
        assert_eq!(config.compiler_options.allow_js, Some(false));
        assert_eq!(config.exclude, vec!["legacy".to_string(), "a//b".to_string()]);
    }

    #[test]
    fn exclude_matches_directories_and_globs() {
        let config = TsConfig::parse(r#"{"exclude": ["legacy", "**/*.test.ts"]}"#).unwrap();
        assert!(config.excludes("legacy/old.ts"));
        assert!(config.excludes("src/a.test.ts"));
        assert!(!config.excludes("src/a.ts"));
    }
}
