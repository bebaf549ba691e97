//! Source project — tree-sitter syntax trees for every non-migration code file.

pub mod ast;
pub mod dialect;
pub mod source_project;
pub mod tsconfig;

pub use dialect::Dialect;
pub use source_project::{SourceFile, SourceProject};
pub use tsconfig::TsConfig;
