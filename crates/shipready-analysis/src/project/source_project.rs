//! Parsed source project: one syntax tree per non-migration code file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use shipready_core::config::ScanConfig;
use shipready_core::errors::{PipelineResult, ScanError};
use shipready_core::tracing::metrics;
use tree_sitter::{Parser, Tree};

use super::ast::error_bytes;
use super::dialect::Dialect;
use super::tsconfig::TsConfig;
use crate::scanner::FileEntry;

/// A successfully parsed file.
pub struct SourceFile {
    pub relative_path: String,
    pub file_path: PathBuf,
    pub dialect: Dialect,
    pub source: String,
    pub tree: Tree,
    /// Bytes covered by ERROR nodes.
    pub error_bytes: usize,
}

impl SourceFile {
    pub fn root(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("relative_path", &self.relative_path)
            .field("dialect", &self.dialect)
            .field("error_bytes", &self.error_bytes)
            .finish()
    }
}

/// All parsed files keyed by relative path.
#[derive(Debug, Default)]
pub struct SourceProject {
    files: BTreeMap<String, SourceFile>,
    tsconfig: Option<TsConfig>,
    skipped: usize,
    excluded: usize,
}

/// Lazily configured parser per dialect, one set per rayon worker.
#[derive(Default)]
struct Parsers {
    typescript: Option<Parser>,
    tsx: Option<Parser>,
    javascript: Option<Parser>,
}

impl Parsers {
    fn get(&mut self, dialect: Dialect) -> Result<&mut Parser, String> {
        let slot = match dialect {
            Dialect::TypeScript => &mut self.typescript,
            Dialect::Tsx => &mut self.tsx,
            Dialect::JavaScript => &mut self.javascript,
        };
        if slot.is_none() {
            let mut parser = Parser::new();
            parser
                .set_language(&dialect.ts_language())
                .map_err(|e| e.to_string())?;
            *slot = Some(parser);
        }
        slot.as_mut().ok_or_else(|| "parser unavailable".to_string())
    }
}

impl SourceProject {
    /// Parse every code file in `files`.
    ///
    /// Files that cannot be read, are not UTF-8, produce no tree, or contain
    /// syntax errors beyond `scan.max_error_ratio` are skipped and reported as
    /// non-fatal errors.
    pub fn build(root: &Path, files: &[FileEntry], config: &ScanConfig) -> PipelineResult<SourceProject> {
        let tsconfig = if config.effective_use_tsconfig() {
            TsConfig::load(root)
        } else {
            None
        };
        if let Some(ts) = &tsconfig {
            tracing::debug!(
                allow_js = ?ts.compiler_options.allow_js,
                exclude = ts.exclude.len(),
                "loaded tsconfig"
            );
        }

        let mut excluded = 0;
        let candidates: Vec<(&FileEntry, Dialect)> = files
            .iter()
            .filter(|f| f.is_code())
            .filter(|f| {
                let dropped = tsconfig
                    .as_ref()
                    .is_some_and(|ts| ts.excludes(&f.relative_path));
                if dropped {
                    excluded += 1;
                }
                !dropped
            })
            .filter_map(|f| Dialect::from_extension(&f.ext).map(|d| (f, d)))
            .collect();

        let max_ratio = config.effective_max_error_ratio();
        let parse_all = || -> Vec<Result<SourceFile, ScanError>> {
            candidates
                .par_iter()
                .map_init(Parsers::default, |parsers, (entry, dialect)| {
                    parse_file(parsers, entry, *dialect, max_ratio)
                })
                .collect()
        };

        let threads = config.effective_threads();
        let outcomes = if threads > 0 {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(parse_all),
                Err(e) => {
                    tracing::warn!(error = %e, "falling back to the global thread pool");
                    parse_all()
                }
            }
        } else {
            parse_all()
        };

        let mut result = PipelineResult::new(SourceProject {
            files: BTreeMap::new(),
            tsconfig,
            skipped: 0,
            excluded,
        });
        for outcome in outcomes {
            match outcome {
                Ok(file) => {
                    result.data.files.insert(file.relative_path.clone(), file);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "skipping file");
                    result.data.skipped += 1;
                    result.add_error(e);
                }
            }
        }

        tracing::info!(
            { metrics::FILES_PARSED } = result.data.files.len(),
            { metrics::FILES_SKIPPED } = result.data.skipped,
            excluded = result.data.excluded,
            "parsed source project"
        );
        result
    }

    pub fn source_file(&self, relative_path: &str) -> Option<&SourceFile> {
        self.files.get(relative_path)
    }

    /// Parsed files in relative-path order.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files dropped because they could not be parsed.
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Files dropped by the target's tsconfig `exclude`.
    pub fn excluded_count(&self) -> usize {
        self.excluded
    }

    pub fn tsconfig(&self) -> Option<&TsConfig> {
        self.tsconfig.as_ref()
    }
}

fn parse_file(
    parsers: &mut Parsers,
    entry: &FileEntry,
    dialect: Dialect,
    max_error_ratio: f64,
) -> Result<SourceFile, ScanError> {
    let bytes = std::fs::read(&entry.file_path).map_err(|source| ScanError::IoError {
        path: entry.file_path.clone(),
        source,
    })?;
    let source = String::from_utf8(bytes).map_err(|_| ScanError::NotUtf8 {
        path: entry.file_path.clone(),
    })?;

    let parser = parsers.get(dialect).map_err(|message| ScanError::ParseFailed {
        path: entry.file_path.clone(),
        message,
    })?;
    let tree = parser.parse(&source, None).ok_or_else(|| ScanError::ParseFailed {
        path: entry.file_path.clone(),
        message: "parser returned no tree".to_string(),
    })?;

    // Any syntax error skips the file unless a tolerance is configured.
    let errors = error_bytes(tree.root_node());
    if tree.root_node().has_error() {
        let ratio = if source.is_empty() {
            1.0
        } else {
            errors as f64 / source.len() as f64
        };
        if max_error_ratio <= 0.0 || ratio > max_error_ratio {
            return Err(ScanError::ParseFailed {
                path: entry.file_path.clone(),
                message: format!("syntax errors cover {:.0}% of the file", ratio * 100.0),
            });
        }
    }

    Ok(SourceFile {
        relative_path: entry.relative_path.clone(),
        file_path: entry.file_path.clone(),
        dialect,
        source,
        tree,
        error_bytes: errors,
    })
}
