//! Import statement extraction for Python scripts.
//!
//! Walks the top level of a parsed script and classifies every import
//! statement into the forms the analyzer cares about. Nested imports
//! (inside functions or classes) are intentionally not collected.

use tree_sitter::{Node, Tree};

use super::python::node_text;

/// The form of an import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// Plain import: `import package.sub`
    Plain,
    /// Plain import with an alias: `import package.sub as alias`
    PlainAliased,
    /// From-import: `from package import sub`
    From,
    /// From-import with an alias: `from package import sub as alias`
    FromAliased,
    /// Wildcard import: `from package import *`
    Wildcard,
}

/// A single top-level import in a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The full imported dotted path (e.g. "package.sub").
    pub path: String,
    /// The name the statement binds in the script's scope: the full dotted
    /// path for a plain import, otherwise the alias or imported identifier.
    pub bound_name: String,
    /// The form of the import.
    pub kind: ImportKind,
    /// Line number in the source file (1-indexed).
    pub line: usize,
}

impl Import {
    /// Returns the last segment of the imported path.
    pub fn symbol_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or("")
    }

    /// Returns true for `from module import *`.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, ImportKind::Wildcard)
    }

    /// Returns true if the statement binds an alias rather than the
    /// imported name itself.
    pub fn is_aliased(&self) -> bool {
        matches!(self.kind, ImportKind::PlainAliased | ImportKind::FromAliased)
    }
}

/// Collect the top-level imports of a parsed script, in source order.
///
/// Relative imports (`from . import x`) are skipped: resolving them is out
/// of scope for this analyzer.
pub fn top_level_imports(tree: &Tree, source: &str) -> Vec<Import> {
    let root = tree.root_node();
    let mut imports = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "import_statement" => parse_import(&child, source, &mut imports),
            "import_from_statement" => parse_import_from(&child, source, &mut imports),
            _ => {}
        }
    }

    imports
}

/// Parse `import a.b` / `import a.b as c`, possibly comma-separated.
fn parse_import(node: &Node, source: &str, imports: &mut Vec<Import>) {
    let line = node.start_position().row + 1;

    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        match name.kind() {
            "dotted_name" => {
                let path = node_text(&name, source).to_string();
                imports.push(Import {
                    bound_name: path.clone(),
                    path,
                    kind: ImportKind::Plain,
                    line,
                });
            }
            "aliased_import" => {
                let (Some(inner), Some(alias)) = (
                    name.child_by_field_name("name"),
                    name.child_by_field_name("alias"),
                ) else {
                    continue;
                };
                imports.push(Import {
                    path: node_text(&inner, source).to_string(),
                    bound_name: node_text(&alias, source).to_string(),
                    kind: ImportKind::PlainAliased,
                    line,
                });
            }
            _ => {}
        }
    }
}

/// Parse `from a import b, c as d` and the wildcard form.
fn parse_import_from(node: &Node, source: &str, imports: &mut Vec<Import>) {
    let line = node.start_position().row + 1;

    let Some(module) = node.child_by_field_name("module_name") else {
        return;
    };

    // `relative_import` module names are out of scope
    if module.kind() != "dotted_name" {
        return;
    }
    let module_path = node_text(&module, source);

    let mut cursor = node.walk();
    let has_wildcard = node
        .children(&mut cursor)
        .any(|c| c.kind() == "wildcard_import");
    if has_wildcard {
        imports.push(Import {
            path: module_path.to_string(),
            bound_name: "*".to_string(),
            kind: ImportKind::Wildcard,
            line,
        });
        return;
    }

    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        match name.kind() {
            "dotted_name" => {
                let target = node_text(&name, source);
                let bound = target.rsplit('.').next().unwrap_or(target);
                imports.push(Import {
                    path: format!("{}.{}", module_path, target),
                    bound_name: bound.to_string(),
                    kind: ImportKind::From,
                    line,
                });
            }
            "aliased_import" => {
                let (Some(inner), Some(alias)) = (
                    name.child_by_field_name("name"),
                    name.child_by_field_name("alias"),
                ) else {
                    continue;
                };
                imports.push(Import {
                    path: format!("{}.{}", module_path, node_text(&inner, source)),
                    bound_name: node_text(&alias, source).to_string(),
                    kind: ImportKind::FromAliased,
                    line,
                });
            }
            _ => {}
        }
    }
}
