//! JavaScript parsing via tree-sitter
//!
//! One place builds the parser so the scanner, the source-type detector,
//! and the rule engine all run the same import/export-capable grammar.

use anyhow::{Context, Result};
use tree_sitter::{Language, Parser, Tree};

/// The JavaScript grammar used for every parse in this crate.
pub fn language() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// Parse JavaScript source text.
///
/// Returns the tree even when it contains error nodes; callers decide how
/// to treat partial parses. `tree.root_node().has_error()` distinguishes a
/// clean parse from a failed one.
pub fn parse_source(code: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .context("Failed to set JavaScript language")?;
    parser.parse(code, None).context("Failed to parse source")
}

/// Position of the first error node in a partial parse, 1-based.
///
/// Falls back to 1:1 when the tree has no explicit error node (e.g. only
/// missing nodes).
pub fn first_error_position(tree: &Tree) -> (u32, u32) {
    fn find(node: tree_sitter::Node) -> Option<(u32, u32)> {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            return Some((pos.row as u32 + 1, pos.column as u32 + 1));
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.has_error() {
                if let Some(found) = find(child) {
                    return Some(found);
                }
            }
        }
        None
    }
    find(tree.root_node()).unwrap_or((1, 1))
}
