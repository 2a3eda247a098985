//! Unsafe HTML assignment rule
//!
//! Flags dynamic assignments to innerHTML/outerHTML. Plain string literals
//! are allowed for direct assignment; any appending assignment is flagged
//! because the accumulated value is no longer reviewable.
//!
//! CWE-79: Cross-site Scripting

use crate::engine::RuleContext;
use crate::models::RawFinding;
use crate::parser;
use crate::rules::Rule;
use anyhow::Result;
use std::sync::OnceLock;
use tree_sitter::{Query, QueryCursor, StreamingIterator};

const ASSIGN_QUERY_STR: &str = r#"
    (assignment_expression
        left: (member_expression
            property: (property_identifier) @prop)
        right: (_) @value
    ) @assign

    (augmented_assignment_expression
        left: (member_expression
            property: (property_identifier) @prop)
        right: (_) @value
    ) @assign
"#;

static ASSIGN_QUERY: OnceLock<Query> = OnceLock::new();

fn assign_query() -> &'static Query {
    ASSIGN_QUERY.get_or_init(|| {
        Query::new(&parser::language(), ASSIGN_QUERY_STR).expect("valid assignment query")
    })
}

const UNSAFE_PROPERTIES: &[&str] = &["innerHTML", "outerHTML"];

pub struct UnsafeAssignment;

impl Rule for UnsafeAssignment {
    fn name(&self) -> &'static str {
        "unsafe-assignment"
    }

    fn description(&self) -> &'static str {
        "Detects dynamic assignments to innerHTML/outerHTML"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RawFinding>> {
        let query = assign_query();
        let mut findings = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, ctx.tree.root_node(), ctx.code.as_bytes());

        while let Some(m) = matches.next() {
            let mut assign_node = None;
            let mut prop = "";
            let mut value_kind = "";

            for capture in m.captures.iter() {
                match query.capture_names()[capture.index as usize] {
                    "assign" => assign_node = Some(capture.node),
                    "prop" => prop = ctx.text(capture.node),
                    "value" => value_kind = capture.node.kind(),
                    _ => {}
                }
            }

            if !UNSAFE_PROPERTIES.contains(&prop) {
                continue;
            }

            let node = match assign_node {
                Some(node) => node,
                None => continue,
            };

            let appending = node.kind() == "augmented_assignment_expression";
            if !appending && value_kind == "string" {
                continue;
            }

            let (line, column) = ctx.position(node);
            findings.push(RawFinding {
                rule_id: self.name().to_string(),
                message: Some("UNSAFE_VAR_ASSIGNMENT".to_string()),
                description: None,
                severity: 2,
                line,
                column,
                snippet: ctx.snippet(node),
                fatal: false,
            });
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::models::SourceType;

    fn check(code: &str) -> Vec<RawFinding> {
        let tree = parser::parse_source(code).expect("parse");
        let config = EngineConfig::fixed(SourceType::Script);
        let ctx = RuleContext {
            code,
            filename: "test.js",
            tree: &tree,
            config: &config,
        };
        UnsafeAssignment.check(&ctx).expect("rule check")
    }

    #[test]
    fn test_flags_dynamic_inner_html() {
        let findings = check("el.innerHTML = userContent;");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message.as_deref(), Some("UNSAFE_VAR_ASSIGNMENT"));
    }

    #[test]
    fn test_flags_outer_html_template() {
        assert_eq!(check("el.outerHTML = `<b>${name}</b>`;").len(), 1);
    }

    #[test]
    fn test_allows_literal_assignment() {
        assert!(check("el.innerHTML = '<b>static</b>';").is_empty());
    }

    #[test]
    fn test_flags_append_even_with_literal() {
        assert_eq!(check("el.innerHTML += '<br>';").len(), 1);
    }

    #[test]
    fn test_ignores_other_properties() {
        assert!(check("el.textContent = userContent;").is_empty());
    }
}
