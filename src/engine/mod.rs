//! Rule execution engine
//!
//! The scanner talks to the engine through the `RuleEngine` trait and
//! treats one invocation as atomic: it either returns the complete finding
//! list for the file or fails. `TreeSitterEngine` is the default
//! implementation; it parses the source once and runs every registered
//! rule against the shared tree.
//!
//! Engine configuration is fixed per scan and never negotiable by the
//! scanned content: inline configuration directives are hard-disabled so
//! source text cannot override scanner policy.

use crate::models::{RawFinding, SourceType};
use crate::parser;
use crate::rules::Rule;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;
use tree_sitter::{Node, Tree};

/// Grammar edition the parser runs with. Always the latest supported.
pub const ECMA_EDITION: &str = "latest";

/// Environment capability flags enabled for every scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvFlags {
    /// Modern ECMAScript syntax and globals.
    pub es2024: bool,
    /// Browser globals (window, document, ...).
    pub browser: bool,
    /// WebExtension globals (browser.*, chrome.*).
    pub webextensions: bool,
}

/// Fixed, security-relevant engine configuration.
///
/// Only the source type varies between scans; everything else is policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub ecma_edition: &'static str,
    pub source_type: SourceType,
    pub env: EnvFlags,
    /// Inline in-source directives must never override scanner policy.
    pub allow_inline_config: bool,
    /// Dependency-style folders are still scanned.
    pub use_default_ignores: bool,
    pub include_dotfiles: bool,
    /// No ambient configuration file is ever auto-loaded.
    pub config_lookup: bool,
}

impl EngineConfig {
    /// The one configuration the scanner ever uses, parameterized only by
    /// the computed source type.
    pub fn fixed(source_type: SourceType) -> Self {
        Self {
            ecma_edition: ECMA_EDITION,
            source_type,
            env: EnvFlags {
                es2024: true,
                browser: true,
                webextensions: true,
            },
            allow_inline_config: false,
            use_default_ignores: false,
            include_dotfiles: true,
            config_lookup: false,
        }
    }
}

/// Everything a rule can see while checking one file.
pub struct RuleContext<'a> {
    pub code: &'a str,
    pub filename: &'a str,
    pub tree: &'a Tree,
    pub config: &'a EngineConfig,
}

impl RuleContext<'_> {
    /// UTF-8 text of a node, empty on any decoding oddity.
    pub fn text(&self, node: Node) -> &str {
        node.utf8_text(self.code.as_bytes()).unwrap_or("")
    }

    /// 1-based line/column of a node's start.
    pub fn position(&self, node: Node) -> (u32, u32) {
        let pos = node.start_position();
        (pos.row as u32 + 1, pos.column as u32 + 1)
    }

    /// Trimmed source line containing a node's start.
    pub fn snippet(&self, node: Node) -> Option<String> {
        let row = node.start_position().row;
        self.code.lines().nth(row).map(|line| line.trim().to_string())
    }
}

/// External rule-execution seam.
///
/// One call per source unit: parse, run the registered rules, return the
/// per-file findings in order.
pub trait RuleEngine {
    fn execute(
        &self,
        code: &str,
        filename: &str,
        rules: &[Arc<dyn Rule>],
        config: &EngineConfig,
    ) -> Result<Vec<RawFinding>>;
}

/// Default engine backed by tree-sitter.
#[derive(Debug, Default)]
pub struct TreeSitterEngine;

impl TreeSitterEngine {
    pub fn new() -> Self {
        Self
    }
}

impl RuleEngine for TreeSitterEngine {
    fn execute(
        &self,
        code: &str,
        filename: &str,
        rules: &[Arc<dyn Rule>],
        config: &EngineConfig,
    ) -> Result<Vec<RawFinding>> {
        let tree = parser::parse_source(code)?;

        if tree.root_node().has_error() {
            // Unparseable source is one fatal finding, not an engine error.
            let (line, column) = parser::first_error_position(&tree);
            debug!("{filename}: parse failed at {line}:{column}");
            return Ok(vec![RawFinding {
                rule_id: "parse".to_string(),
                message: Some(format!("Parsing error at line {line} column {column}")),
                description: None,
                severity: 2,
                line,
                column,
                snippet: code.lines().nth(line as usize - 1).map(|l| l.trim().to_string()),
                fatal: true,
            }]);
        }

        let ctx = RuleContext {
            code,
            filename,
            tree: &tree,
            config,
        };

        let mut findings = Vec::new();
        for rule in rules {
            let mut rule_findings = rule
                .check(&ctx)
                .with_context(|| format!("rule `{}` failed", rule.name()))?;
            debug!(
                "{filename}: rule {} reported {} finding(s)",
                rule.name(),
                rule_findings.len()
            );
            findings.append(&mut rule_findings);
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin_registry;

    #[test]
    fn test_fixed_config_policy() {
        let config = EngineConfig::fixed(SourceType::Module);
        assert_eq!(config.source_type, SourceType::Module);
        assert!(!config.allow_inline_config);
        assert!(!config.use_default_ignores);
        assert!(!config.config_lookup);
        assert!(config.include_dotfiles);
        assert!(config.env.browser && config.env.webextensions && config.env.es2024);
    }

    #[test]
    fn test_unparseable_source_yields_single_fatal_finding() {
        let engine = TreeSitterEngine::new();
        let config = EngineConfig::fixed(SourceType::Script);
        let findings = engine
            .execute("function( {", "bad.js", &builtin_registry(), &config)
            .expect("engine should not error on bad syntax");
        assert_eq!(findings.len(), 1);
        assert!(findings[0].fatal);
        assert_eq!(findings[0].severity, 2);
        assert!(findings[0].message.is_some());
    }

    #[test]
    fn test_clean_source_runs_rules() {
        let engine = TreeSitterEngine::new();
        let config = EngineConfig::fixed(SourceType::Script);
        let findings = engine
            .execute("eval(userInput);", "bg.js", &builtin_registry(), &config)
            .expect("engine run");
        assert!(findings.iter().any(|f| f.rule_id == "dangerous-eval"));
        assert!(findings.iter().all(|f| !f.fatal));
    }

    #[test]
    fn test_no_rules_no_findings() {
        let engine = TreeSitterEngine::new();
        let config = EngineConfig::fixed(SourceType::Script);
        let findings = engine
            .execute("eval(userInput);", "bg.js", &[], &config)
            .expect("engine run");
        assert!(findings.is_empty());
    }
}
