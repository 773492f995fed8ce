//! Source code analysis module for ImportScope.
//!
//! This module extracts, for a Python script, the source text of every
//! project-local symbol the script references through its imports.
//!
//! # Features
//!
//! - Classify top-level import statements (plain, aliased, from-import)
//! - Resolve imported dotted paths to filesystem origins without executing code
//! - Scan for the attributes actually accessed off each imported name
//! - Extract the exact source text of referenced top-level definitions
//! - Aggregate results across every script in a project tree
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use importscope::analysis::{extract_from_script, analyze_project};
//!
//! // Analyze a single script
//! let sources = extract_from_script(Path::new("pipeline/task.py"))?;
//! for (dotted_path, source) in sources.iter() {
//!     println!("{}: {:?}", dotted_path, source);
//! }
//!
//! // Analyze every script under a directory
//! let project = analyze_project(Path::new("pipeline"))?;
//! println!("analyzed {} scripts", project.len());
//! ```

pub mod attributes;
pub mod extract;
pub mod symbols;

// Re-export main types for convenience
pub use attributes::extract_attribute_access;
pub use extract::{
    analyze_project, extract_from_script, ExtractError, ExtractResult, ExtractedSources,
    ProjectSources, ScriptAnalyzer,
};
pub use symbols::extract_symbol;
