//! Project tree walker built on `ignore`.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use rustc_hash::FxHashSet;
use shipready_core::config::ScanConfig;
use shipready_core::errors::{PipelineResult, ScanError};
use shipready_core::tracing::metrics;

use super::types::{FileCatalog, FileEntry};

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Catalogues every file under a project root that matches the include globs.
pub struct FileIndexer {
    root: PathBuf,
    include: Vec<Pattern>,
    exclude_dirs: FxHashSet<String>,
    exclude_paths: Vec<String>,
    respect_gitignore: bool,
    max_file_size: u64,
}

impl FileIndexer {
    /// Build an indexer from scan configuration.
    ///
    /// Invalid include globs are dropped with a warning; if none survive the
    /// built-in defaults are used instead.
    pub fn new(root: &Path, config: &ScanConfig) -> Self {
        let mut include: Vec<Pattern> = config
            .effective_include()
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(pattern = %raw, error = %e, "dropping invalid include glob");
                    None
                }
            })
            .collect();
        if include.is_empty() {
            include = ScanConfig::default()
                .effective_include()
                .iter()
                .filter_map(|raw| Pattern::new(raw).ok())
                .collect();
        }

        Self {
            root: root.to_path_buf(),
            include,
            exclude_dirs: config.effective_exclude_dirs().into_iter().collect(),
            exclude_paths: config
                .effective_exclude_paths()
                .into_iter()
                .map(|p| normalize_prefix(&p))
                .filter(|p| !p.is_empty())
                .collect(),
            respect_gitignore: config.effective_respect_gitignore(),
            max_file_size: config.effective_max_file_size(),
        }
    }

    /// Exclude additional paths. Absolute paths outside the root are ignored.
    pub fn exclude_path(mut self, path: &Path) -> Self {
        let relative = if path.is_absolute() {
            match path.strip_prefix(&self.root) {
                Ok(rel) => to_slash(rel),
                Err(_) => return self,
            }
        } else {
            to_slash(path)
        };
        let prefix = normalize_prefix(&relative);
        if !prefix.is_empty() && !self.exclude_paths.contains(&prefix) {
            self.exclude_paths.push(prefix);
        }
        self
    }

    /// Walk the tree. An unreadable root is fatal; per-entry failures are
    /// collected as non-fatal errors.
    pub fn index(&self) -> Result<PipelineResult<FileCatalog>, ScanError> {
        if !self.root.is_dir() || std::fs::read_dir(&self.root).is_err() {
            return Err(ScanError::RootUnreadable {
                path: self.root.clone(),
            });
        }

        let mut result = PipelineResult::new(FileCatalog::default());
        let walker = self.walk_builder().build();

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "walk error");
                    result.add_error(ScanError::IoError {
                        path: self.root.clone(),
                        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let relative = match path.strip_prefix(&self.root) {
                Ok(rel) => to_slash(rel),
                Err(_) => continue,
            };
            if !self.is_included(&relative) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() > self.max_file_size => {
                    result.data.skipped_large += 1;
                    result.add_error(ScanError::MaxFileSizeExceeded {
                        path: path.to_path_buf(),
                        size: meta.len(),
                        max: self.max_file_size,
                    });
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    result.add_error(ScanError::IoError {
                        path: path.to_path_buf(),
                        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
                    });
                    continue;
                }
            }

            result
                .data
                .entries
                .push(FileEntry::new(path.to_path_buf(), relative));
        }

        result
            .data
            .entries
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        tracing::info!(
            { metrics::FILES_INDEXED } = result.data.len(),
            { metrics::MIGRATION_FILES } = result.data.migration_files().count(),
            root = %self.root.display(),
            "indexed project"
        );

        Ok(result)
    }

    fn is_included(&self, relative: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_with(relative, GLOB_OPTIONS))
    }

    fn walk_builder(&self) -> WalkBuilder {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .follow_links(false)
            .parents(false)
            .require_git(false)
            .ignore(self.respect_gitignore)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .git_global(false);

        let root = self.root.clone();
        let exclude_dirs = self.exclude_dirs.clone();
        let exclude_paths = self.exclude_paths.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if is_dir {
                if let Some(name) = entry.file_name().to_str() {
                    if exclude_dirs.contains(name) {
                        return false;
                    }
                }
            }
            let relative = match entry.path().strip_prefix(&root) {
                Ok(rel) => to_slash(rel),
                Err(_) => return true,
            };
            !exclude_paths.iter().any(|prefix| is_under(&relative, prefix))
        });
        builder
    }
}

/// `path` equals `prefix` or lies beneath it.
fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn normalize_prefix(raw: &str) -> String {
    raw.replace('\\', "/")
        .trim_start_matches("./")
        .trim_matches('/')
        .to_string()
}

/// Render a relative path with `/` separators on every platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching_respects_segment_boundaries() {
        assert!(is_under("tools/shipready/index.ts", "tools/shipready"));
        assert!(is_under("tools/shipready", "tools/shipready"));
        assert!(!is_under("tools/shipready-extra/index.ts", "tools/shipready"));
    }

    #[test]
    fn prefixes_are_normalized() {
        assert_eq!(normalize_prefix("./legacy/"), "legacy");
        assert_eq!(normalize_prefix("a\\b"), "a/b");
    }
}
