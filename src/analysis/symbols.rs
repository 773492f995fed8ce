//! Top-level symbol extraction.
//!
//! Recovers the exact source text of a named function or class defined at
//! module scope. Nothing else is considered: constants, re-exports, and
//! dynamically created attributes have no static definition to extract, and
//! a miss is a normal outcome rather than an error.

use crate::parser::python::{node_text, ParseResult, PythonParser};

/// Find the first top-level function or class named `name` in
/// `module_source` and return its trimmed source text.
///
/// Decorated definitions match by the name of the inner definition and
/// return the full decorated text. Nested definitions are never matched.
pub fn extract_symbol(module_source: &str, name: &str) -> ParseResult<Option<String>> {
    let mut parser = PythonParser::new()?;
    let tree = parser.parse(module_source)?;
    let root = tree.root_node();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        let definition = match child.kind() {
            "function_definition" | "class_definition" => child,
            "decorated_definition" => match child.child_by_field_name("definition") {
                Some(definition) => definition,
                None => continue,
            },
            _ => continue,
        };

        let Some(name_node) = definition.child_by_field_name("name") else {
            continue;
        };

        if node_text(&name_node, module_source) == name {
            return Ok(Some(node_text(&child, module_source).trim().to_string()));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULE: &str = "\
def a():
    pass

class B:
    pass
";

    #[test]
    fn test_extract_function() {
        assert_eq!(
            extract_symbol(MODULE, "a").unwrap(),
            Some("def a():\n    pass".to_string())
        );
    }

    #[test]
    fn test_extract_class() {
        assert_eq!(
            extract_symbol(MODULE, "B").unwrap(),
            Some("class B:\n    pass".to_string())
        );
    }

    #[test]
    fn test_missing_symbol_is_none() {
        assert_eq!(extract_symbol(MODULE, "missing").unwrap(), None);
    }

    #[test]
    fn test_constant_is_not_extractable() {
        let source = "THRESHOLD = 10\n";
        assert_eq!(extract_symbol(source, "THRESHOLD").unwrap(), None);
    }

    #[test]
    fn test_nested_definition_not_matched() {
        let source = "\
def outer():
    def inner():
        pass
    return inner
";
        assert_eq!(extract_symbol(source, "inner").unwrap(), None);
    }

    #[test]
    fn test_decorated_definition_includes_decorator() {
        let source = "\
@cache
def slow():
    return compute()
";
        assert_eq!(
            extract_symbol(source, "slow").unwrap(),
            Some("@cache\ndef slow():\n    return compute()".to_string())
        );
    }

    #[test]
    fn test_first_definition_wins() {
        let source = "\
def dup():
    return 1

def dup():
    return 2
";
        assert_eq!(
            extract_symbol(source, "dup").unwrap(),
            Some("def dup():\n    return 1".to_string())
        );
    }
}
