//! Implied eval rule
//!
//! setTimeout and setInterval compile string arguments as code. This rule
//! emits free-form message text; the overwrite table maps its rule id onto
//! the canonical NO_IMPLIED_EVAL code during normalization.

use crate::engine::RuleContext;
use crate::models::RawFinding;
use crate::parser;
use crate::rules::Rule;
use anyhow::Result;
use std::sync::OnceLock;
use tree_sitter::{Query, QueryCursor, StreamingIterator};

const TIMER_QUERY_STR: &str = r#"
    (call_expression
        function: (identifier) @callee
        arguments: (arguments) @args
    ) @call
"#;

static TIMER_QUERY: OnceLock<Query> = OnceLock::new();

fn timer_query() -> &'static Query {
    TIMER_QUERY.get_or_init(|| {
        Query::new(&parser::language(), TIMER_QUERY_STR).expect("valid timer query")
    })
}

const TIMER_CALLEES: &[&str] = &["setTimeout", "setInterval"];

pub struct ImpliedEval;

impl Rule for ImpliedEval {
    fn name(&self) -> &'static str {
        "no-implied-eval"
    }

    fn description(&self) -> &'static str {
        "Detects string arguments to setTimeout/setInterval"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RawFinding>> {
        let query = timer_query();
        let mut findings = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, ctx.tree.root_node(), ctx.code.as_bytes());

        while let Some(m) = matches.next() {
            let mut call_node = None;
            let mut callee = "";
            let mut args_node = None;

            for capture in m.captures.iter() {
                match query.capture_names()[capture.index as usize] {
                    "call" => call_node = Some(capture.node),
                    "callee" => callee = ctx.text(capture.node),
                    "args" => args_node = Some(capture.node),
                    _ => {}
                }
            }

            if !TIMER_CALLEES.contains(&callee) {
                continue;
            }

            let first_arg_kind = args_node.and_then(|args| args.named_child(0)).map(|a| a.kind());
            if !matches!(first_arg_kind, Some("string") | Some("template_string")) {
                continue;
            }

            if let Some(node) = call_node {
                let (line, column) = ctx.position(node);
                findings.push(RawFinding {
                    rule_id: self.name().to_string(),
                    message: Some(format!(
                        "String passed to {callee}() is compiled as code"
                    )),
                    description: None,
                    severity: 2,
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
