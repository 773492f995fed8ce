//! Tree-sitter wrapper for Python source.
//!
//! Provides the parsing primitives the rest of the crate builds on: parsing
//! a source string into a syntax tree, exact source-text reconstruction per
//! node, and comment stripping.

use tree_sitter::{Node, Parser, Tree};

/// Errors that can occur while parsing Python source.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Tree-sitter rejected the Python grammar.
    #[error("Tree-sitter language initialization failed")]
    LanguageInit,

    /// The parser produced no tree at all.
    #[error("Parser returned no tree for the given source")]
    ParseFailed,

    /// The source parsed, but contains syntax errors. No degraded analysis
    /// is attempted on top of a broken tree.
    #[error("Source contains syntax errors")]
    InvalidSyntax,
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parser for Python source files.
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new PythonParser.
    pub fn new() -> ParseResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser })
    }

    /// Parse a source string into a syntax tree.
    ///
    /// Malformed source is a hard failure: a tree containing error nodes is
    /// rejected rather than analyzed partially.
    pub fn parse(&mut self, source: &str) -> ParseResult<Tree> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::ParseFailed)?;

        if tree.root_node().has_error() {
            return Err(ParseError::InvalidSyntax);
        }

        Ok(tree)
    }

    /// Return `source` with all `#` comments removed.
    ///
    /// The removal is span-based on the tree's `comment` nodes, so a `#`
    /// inside a string literal is left untouched.
    pub fn strip_comments(&mut self, source: &str) -> ParseResult<String> {
        let tree = self.parse(source)?;

        let mut ranges = Vec::new();
        collect_comment_ranges(tree.root_node(), &mut ranges);

        // Ranges come out of a pre-order walk, so they are already in
        // document order and non-overlapping.
        let mut stripped = String::with_capacity(source.len());
        let mut pos = 0;
        for range in ranges {
            stripped.push_str(&source[pos..range.start]);
            pos = range.end;
        }
        stripped.push_str(&source[pos..]);

        Ok(stripped)
    }
}

/// Extract the exact source text of a node.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

fn collect_comment_ranges(node: Node, ranges: &mut Vec<std::ops::Range<usize>>) {
    if node.kind() == "comment" {
        ranges.push(node.byte_range());
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_comment_ranges(child, ranges);
    }
}
