//! document.write rule
//!
//! Flags document.write and document.writeln calls. Reported as a warning
//! rather than an error: the pattern is discouraged but not inherently
//! exploitable.

use crate::engine::RuleContext;
use crate::models::RawFinding;
use crate::parser;
use crate::rules::Rule;
use anyhow::Result;
use std::sync::OnceLock;
use tree_sitter::{Query, QueryCursor, StreamingIterator};

const WRITE_QUERY_STR: &str = r#"
    (call_expression
        function: (member_expression
            object: (identifier) @obj
            property: (property_identifier) @prop)
    ) @call
"#;

static WRITE_QUERY: OnceLock<Query> = OnceLock::new();

fn write_query() -> &'static Query {
    WRITE_QUERY.get_or_init(|| {
        Query::new(&parser::language(), WRITE_QUERY_STR).expect("valid write query")
    })
}

pub struct DocumentWrite;

impl Rule for DocumentWrite {
    fn name(&self) -> &'static str {
        "no-document-write"
    }

    fn description(&self) -> &'static str {
        "Detects document.write and document.writeln calls"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RawFinding>> {
        let query = write_query();
        let mut findings = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, ctx.tree.root_node(), ctx.code.as_bytes());

        while let Some(m) = matches.next() {
            let mut call_node = None;
            let mut obj = "";
            let mut prop = "";

            for capture in m.captures.iter() {
                match query.capture_names()[capture.index as usize] {
                    "call" => call_node = Some(capture.node),
                    "obj" => obj = ctx.text(capture.node),
                    "prop" => prop = ctx.text(capture.node),
                    _ => {}
                }
            }

            if obj != "document" || !matches!(prop, "write" | "writeln") {
                continue;
            }

            if let Some(node) = call_node {
                let (line, column) = ctx.position(node);
                findings.push(RawFinding {
                    rule_id: self.name().to_string(),
                    message: Some("NO_DOCUMENT_WRITE".to_string()),
                    description: None,
                    severity: 1,
                    line,
                    column,
                    snippet: ctx.snippet(node),
                    fatal: false,
                });
            }
        }

        Ok(findings)
    }
}
