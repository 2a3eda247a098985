//! Module vs script classification by AST inspection
//!
//! A file is a module when an import/export construct is reachable along
//! the navigation schema below; otherwise it is a script. Source that does
//! not parse cleanly is a script: the caller still scans it, and the
//! engine reports the syntax error as an ordinary diagnostic.
//!
//! The traversal has a deliberate asymmetry inherited from the reference
//! scanner: within one node, sequence-valued fields are scanned element by
//! element, but the first single-node field that is present is recursed
//! into and its result returned directly, without examining any later
//! fields of that node. Downstream grammar selection depends on this exact
//! behavior, so it is reproduced as-is.

use crate::models::SourceType;
use crate::parser;
use tracing::debug;
use tree_sitter::Node;

/// Node kinds that mark a source as a module on sight.
const MODULE_KINDS: &[&str] = &[
    "import_statement",
    "export_statement",
    "import_specifier",
    "export_specifier",
    "namespace_import",
];

/// One navigable slot of a node kind, in declared order.
#[derive(Debug, Clone, Copy)]
enum Field {
    /// A single child under a grammar field name.
    One(&'static str),
    /// All named children, scanned as an ordered sequence.
    NamedChildren,
}

use Field::{NamedChildren, One};

/// Navigation schema: node kind to its ordered navigable fields.
///
/// Kinds absent from the schema have no navigable children and classify
/// as script.
fn navigable_fields(kind: &str) -> &'static [Field] {
    match kind {
        "program" | "statement_block" | "class_body" | "switch_body" | "switch_case"
        | "switch_default" | "else_clause" | "array" | "object" | "arguments"
        | "formal_parameters" | "parenthesized_expression" | "expression_statement"
        | "return_statement" | "throw_statement" | "template_string" | "template_substitution"
        | "sequence_expression" | "spread_element" | "await_expression" | "yield_expression"
        | "variable_declaration" | "lexical_declaration" => &[NamedChildren],
        "variable_declarator" => &[One("name"), One("value")],
        "if_statement" => &[One("condition"), One("consequence"), One("alternative")],
        "for_statement" => &[
            One("initializer"),
            One("condition"),
            One("increment"),
            One("body"),
        ],
        "for_in_statement" => &[One("left"), One("right"), One("body")],
        "while_statement" => &[One("condition"), One("body")],
        "do_statement" => &[One("body"), One("condition")],
        "function_declaration" | "function_expression" | "generator_function_declaration"
        | "generator_function" | "method_definition" => {
            &[One("name"), One("parameters"), One("body")]
        }
        "arrow_function" => &[One("parameter"), One("parameters"), One("body")],
        "call_expression" => &[One("function"), One("arguments")],
        "new_expression" => &[One("constructor"), One("arguments")],
        "member_expression" => &[One("object"), One("property")],
        "subscript_expression" => &[One("object"), One("index")],
        "assignment_expression" | "augmented_assignment_expression" | "binary_expression" => {
            &[One("left"), One("right")]
        }
        "unary_expression" | "update_expression" => &[One("argument")],
        "ternary_expression" => &[One("condition"), One("consequence"), One("alternative")],
        "pair" => &[One("key"), One("value")],
        "labeled_statement" => &[One("label"), One("body")],
        "switch_statement" => &[One("value"), One("body")],
        "try_statement" => &[One("body"), One("handler"), One("finalizer")],
        "catch_clause" => &[One("parameter"), One("body")],
        "class_declaration" | "class" => &[One("name"), One("body")],
        _ => &[],
    }
}

/// Classify source text as module or script.
///
/// Never fails: unparseable source classifies as script.
pub fn classify(code: &str) -> SourceType {
    let tree = match parser::parse_source(code) {
        Ok(tree) => tree,
        Err(err) => {
            debug!("parser unavailable, classifying as script: {err}");
            return SourceType::Script;
        }
    };
    if tree.root_node().has_error() {
        return SourceType::Script;
    }
    classify_node(tree.root_node())
}

fn classify_node(node: Node) -> SourceType {
    if MODULE_KINDS.contains(&node.kind()) {
        return SourceType::Module;
    }
    for field in navigable_fields(node.kind()) {
        match field {
            NamedChildren => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if classify_node(child) == SourceType::Module {
                        return SourceType::Module;
                    }
                }
            }
            One(name) => {
                if let Some(child) = node.child_by_field_name(name) {
                    // First present single-node field decides the whole
                    // node; later fields are never examined.
                    return classify_node(child);
                }
            }
        }
    }
    SourceType::Script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_is_module() {
        assert_eq!(classify("export const x = 1;"), SourceType::Module);
    }

    #[test]
    fn test_import_is_module() {
        assert_eq!(classify("import {a} from './a.js';"), SourceType::Module);
    }

    #[test]
    fn test_default_export_is_module() {
        assert_eq!(classify("export default function foo() {}"), SourceType::Module);
    }

    #[test]
    fn test_plain_var_is_script() {
        assert_eq!(classify("var x = 1;"), SourceType::Script);
    }

    #[test]
    fn test_later_top_level_statement_still_found() {
        let code = "var a = 1;\nfunction f() { return a; }\nexport {a};";
        assert_eq!(classify(code), SourceType::Module);
    }

    #[test]
    fn test_unparseable_is_script() {
        assert_eq!(classify("function( {"), SourceType::Script);
    }

    #[test]
    fn test_empty_source_is_script() {
        assert_eq!(classify(""), SourceType::Script);
        assert_eq!(classify("// just a comment"), SourceType::Script);
    }

    #[test]
    fn test_dynamic_import_call_is_script() {
        // import() is an expression, not an import declaration.
        assert_eq!(
            classify("import('./mod.js').then(m => m.run());"),
            SourceType::Script
        );
    }
}
