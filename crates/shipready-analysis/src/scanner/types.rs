//! Catalog data types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One discovered file. Immutable once produced by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Absolute path on disk.
    pub file_path: PathBuf,
    /// Path relative to the project root, always `/`-separated.
    pub relative_path: String,
    /// Lower-cased extension without the dot.
    pub ext: String,
    /// SQL file under a `migrations` directory.
    pub is_migration: bool,
}

impl FileEntry {
    pub fn new(file_path: PathBuf, relative_path: String) -> Self {
        let ext = relative_path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let is_migration =
            ext == "sql" && relative_path.split('/').any(|segment| segment == "migrations");
        Self {
            file_path,
            relative_path,
            ext,
            is_migration,
        }
    }

    /// The file name component of the relative path.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Name without extension, e.g. `page` for `app/page.tsx`.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
    }

    /// TS/TSX/JS/JSX source that the syntax project can load.
    pub fn is_code(&self) -> bool {
        !self.is_migration
            && matches!(
                self.ext.as_str(),
                "ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs"
            )
    }
}

/// The flat file catalog for one scan run, sorted by relative path.
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    pub entries: Vec<FileEntry>,
    /// Files skipped because they exceeded the size limit.
    pub skipped_large: usize,
}

impl FileCatalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-migration code files, in catalog order.
    pub fn code_files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| e.is_code())
    }

    /// SQL migration files, in catalog order.
    pub fn migration_files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| e.is_migration)
    }
}
