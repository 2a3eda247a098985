//! Core data models for addonscan
//!
//! These models are shared across the scanner pipeline: the unit of source
//! text handed in by the caller, the raw findings produced by the rule
//! engine, and the canonical diagnostics returned to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

/// Source-level semantic mode of a JavaScript file.
///
/// Module sources use import/export semantics; script sources do not.
/// The mode decides which grammar the downstream parser runs with, so a
/// wrong classification surfaces as spurious or missing import/export
/// syntax diagnostics later in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Module,
    Script,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Module => write!(f, "module"),
            SourceType::Script => write!(f, "script"),
        }
    }
}

/// Diagnostic category derived from a rule's numeric severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Notice,
    Warning,
    Error,
}

impl DiagnosticKind {
    /// Map an engine severity number to a category.
    ///
    /// 2 is an error, 1 a warning, anything else a notice. This mirrors
    /// the classic linter convention of numeric severities.
    pub fn from_severity(severity: i64) -> Self {
        match severity {
            2 => DiagnosticKind::Error,
            1 => DiagnosticKind::Warning,
            _ => DiagnosticKind::Notice,
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Notice => write!(f, "notice"),
            DiagnosticKind::Warning => write!(f, "warning"),
            DiagnosticKind::Error => write!(f, "error"),
        }
    }
}

/// One unit of source text to scan, created once per scan invocation.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// The JavaScript source text.
    pub code: String,
    /// Path of the file inside the bundle. Must be non-empty.
    pub filename: String,
    /// Rule names to exclude from this scan, in caller order.
    pub disabled_rules: Vec<String>,
    /// Opaque caller metadata, passed through untouched.
    pub metadata: JsonValue,
}

impl SourceUnit {
    pub fn new(code: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            filename: filename.into(),
            disabled_rules: Vec::new(),
            metadata: JsonValue::Null,
        }
    }

    pub fn with_disabled_rules(mut self, rules: Vec<String>) -> Self {
        self.disabled_rules = rules;
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A finding exactly as the rule engine reported it, before normalization.
///
/// `message` may be `None`, which is a contract violation on the rule's
/// part: the normalizer turns that into a hard failure rather than a
/// degraded diagnostic.
#[derive(Debug, Clone)]
pub struct RawFinding {
    /// Name of the rule that produced the finding.
    pub rule_id: String,
    /// Message code or human-readable text. `None` means a broken rule.
    pub message: Option<String>,
    /// Optional longer description from the rule.
    pub description: Option<String>,
    /// Numeric severity (2 = error, 1 = warning).
    pub severity: i64,
    /// 1-based line of the finding.
    pub line: u32,
    /// 1-based column of the finding.
    pub column: u32,
    /// Offending source excerpt, when the rule captured one.
    pub snippet: Option<String>,
    /// True when the source could not be parsed at all.
    pub fatal: bool,
}

/// One reported issue in the uniform shape all rule families resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDiagnostic {
    /// Canonical message code (e.g. `DANGEROUS_EVAL`).
    pub code: String,
    /// Short human-readable description.
    pub message: String,
    /// Longer description, when the catalog or rule supplied one.
    pub description: Option<String>,
    /// File the finding was reported against.
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Offending source excerpt.
    pub snippet: Option<String>,
    /// Severity category.
    pub kind: DiagnosticKind,
}

/// Accumulated output of a scanner instance.
///
/// Diagnostics append across successive `scan` calls on the same scanner;
/// each scanned filename is recorded once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub diagnostics: Vec<CanonicalDiagnostic>,
    pub scanned_files: BTreeSet<String>,
}

impl ScanResult {
    /// Count diagnostics at error severity.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
            .count()
    }
}
