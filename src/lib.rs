//! ImportScope - static import analysis for Python scripts
//!
//! This crate analyzes a Python script's import statements and extracts the
//! source text of the project-local functions and classes the script
//! actually references, as a mapping from dotted path to source text.

pub mod analysis;
pub mod parser;
pub mod resolve;
