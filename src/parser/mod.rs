//! Parser module for ImportScope.
//!
//! This module wraps tree-sitter's Python grammar and exposes the pieces of
//! the syntax tree the analyzer needs:
//!
//! - parsing a source string into a tree (with hard failure on syntax errors)
//! - exact source-text reconstruction per node
//! - comment stripping ahead of lexical matching
//! - classification of a script's top-level import statements
//!
//! # Example
//!
//! ```ignore
//! use importscope::parser::{top_level_imports, PythonParser};
//!
//! let mut parser = PythonParser::new()?;
//! let source = "import package.sub as alias\n";
//! let tree = parser.parse(source)?;
//!
//! for import in top_level_imports(&tree, source) {
//!     println!("{} bound as {}", import.path, import.bound_name);
//! }
//! ```

pub mod imports;
pub mod python;

// Re-export commonly used types for convenience
pub use imports::{top_level_imports, Import, ImportKind};
pub use python::{node_text, ParseError, ParseResult, PythonParser};
