//! Attribute-access scanning.
//!
//! Finds the attributes a script actually accesses off a name bound by an
//! import, so that only the referenced symbols of a module are tracked.
//!
//! The scan is purely lexical/structural: it matches attribute chains by
//! their reconstructed source text and does not track control flow or
//! rebinding. If the bound name is reassigned to something else later in
//! the script, subsequent accesses still match. This is a documented
//! precision limitation, kept deliberately.

use tree_sitter::Node;

use crate::parser::python::{node_text, ParseResult, PythonParser};

/// Scan `source` for attribute accesses rooted at `bound_name` and return
/// the distinct dotted suffixes in first-occurrence order.
///
/// `bound_name` may itself be dotted (e.g. `mod.sub`). A trailing call or
/// subscript is not part of the suffix (`mod.sub.fn(1)` yields `fn`,
/// `mod.sub.x[0]` yields `x`), while multi-level chains stay joined
/// (`mod.sub.a.b` yields `a.b` as one entry).
pub fn extract_attribute_access(source: &str, bound_name: &str) -> ParseResult<Vec<String>> {
    let mut parser = PythonParser::new()?;

    // comments would otherwise leak into reconstructed statement text
    let stripped = parser.strip_comments(source)?;
    let tree = parser.parse(&stripped)?;

    let mut suffixes = Vec::new();
    visit(tree.root_node(), &stripped, bound_name, &mut suffixes);

    Ok(suffixes)
}

fn visit(node: Node, source: &str, bound_name: &str, suffixes: &mut Vec<String>) {
    if node.kind() == "attribute" {
        if let Some(suffix) = chain_suffix(&node, source, bound_name) {
            // dedup by final string, keeping first occurrence
            if !suffixes.iter().any(|s| s == &suffix) {
                suffixes.push(suffix);
            }
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, source, bound_name, suffixes);
    }
}

/// If `node` is the innermost attribute access rooted at `bound_name`,
/// return the full dotted suffix of the enclosing chain.
///
/// The chain is climbed through enclosing `attribute` nodes only, so it
/// stops naturally before a call or subscript operator.
fn chain_suffix(node: &Node, source: &str, bound_name: &str) -> Option<String> {
    let object = node.child_by_field_name("object")?;
    if node_text(&object, source) != bound_name {
        return None;
    }

    let mut segments = vec![attribute_name(node, source)?];
    let mut current = *node;
    while let Some(parent) = current.parent() {
        if parent.kind() != "attribute" {
            break;
        }
        let current_is_object =
            parent.child_by_field_name("object").map(|o| o.id()) == Some(current.id());
        if !current_is_object {
            break;
        }
        segments.push(attribute_name(&parent, source)?);
        current = parent;
    }

    Some(segments.join("."))
}

fn attribute_name(node: &Node, source: &str) -> Option<String> {
    node.child_by_field_name("attribute")
        .map(|attr| node_text(&attr, source).to_string())
}
