//! Dangerous eval rule
//!
//! Flags eval() and the Function constructor when their argument is not a
//! plain string literal. Evaluating dynamic strings is the classic remote
//! code execution vector in extension code.
//!
//! CWE-94: Code Injection

use crate::engine::RuleContext;
use crate::models::RawFinding;
use crate::parser;
use crate::rules::Rule;
use anyhow::Result;
use std::sync::OnceLock;
use tree_sitter::{Query, QueryCursor, StreamingIterator};

/// Call sites with a bare-identifier callee, covering both `eval(x)` and
/// `new Function(x)`.
const EVAL_QUERY_STR: &str = r#"
    (call_expression
        function: (identifier) @callee
        arguments: (arguments) @args
    ) @call

    (new_expression
        constructor: (identifier) @callee
        arguments: (arguments) @args
    ) @call
"#;

static EVAL_QUERY: OnceLock<Query> = OnceLock::new();

fn eval_query() -> &'static Query {
    EVAL_QUERY.get_or_init(|| {
        Query::new(&parser::language(), EVAL_QUERY_STR).expect("valid eval query")
    })
}

const EVAL_CALLEES: &[&str] = &["eval", "Function"];

pub struct DangerousEval;

impl Rule for DangerousEval {
    fn name(&self) -> &'static str {
        "dangerous-eval"
    }

    fn description(&self) -> &'static str {
        "Detects eval() and Function() with non-literal arguments"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RawFinding>> {
        let query = eval_query();
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

            if !EVAL_CALLEES.contains(&callee) {
                continue;
            }

            // eval("literal") cannot be influenced by outside input.
            let first_arg = args_node.and_then(|args| args.named_child(0));
            if matches!(first_arg.map(|a| a.kind()), Some("string") | None) {
                continue;
            }

            if let Some(node) = call_node {
                let (line, column) = ctx.position(node);
                findings.push(RawFinding {
                    rule_id: self.name().to_string(),
                    message: Some("DANGEROUS_EVAL".to_string()),
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
