//! Diagnostic normalization
//!
//! Raw findings arrive in different message shapes depending on which rule
//! family produced them: built-in rules emit catalog codes, remapped rules
//! emit free-form text covered by the overwrite table, and anything else
//! falls through verbatim. Normalization resolves each finding through an
//! ordered set of tiers, first match wins, so every finding becomes one
//! `CanonicalDiagnostic`.
//!
//! Tier order:
//! 1. fatal findings are reported under the reserved syntax-error code
//! 2. message is a catalog key: catalog text verbatim
//! 3. rule id is in the overwrite table: overwrite fields with raw
//!    fallbacks
//! 4. message passes through as both code and short description
//!
//! A finding with no message at all aborts the scan: that is a broken
//! rule, not a content problem.

use crate::error::ScanError;
use crate::messages::{MessageCatalog, OverwriteTable, JS_SYNTAX_ERROR};
use crate::models::{CanonicalDiagnostic, DiagnosticKind, RawFinding};

/// Resolve one raw finding into the canonical diagnostic shape.
pub fn normalize(
    raw: RawFinding,
    filename: &str,
    catalog: &MessageCatalog,
    overwrites: &OverwriteTable,
) -> Result<CanonicalDiagnostic, ScanError> {
    let message = match raw.message {
        Some(message) => message,
        None => {
            return Err(ScanError::RuleContractViolation {
                rule_id: raw.rule_id,
            })
        }
    };

    // Tier 1: unparseable source always reports under the reserved code,
    // regardless of the engine's own message text.
    let message = if raw.fatal {
        JS_SYNTAX_ERROR.to_string()
    } else {
        message
    };

    let kind = DiagnosticKind::from_severity(raw.severity);

    // Tier 2: the message itself is a catalog code.
    if let Some(entry) = catalog.get(message.as_str()) {
        return Ok(CanonicalDiagnostic {
            code: message.clone(),
            message: entry.short_description.to_string(),
            description: Some(entry.long_description.to_string()),
            file: filename.to_string(),
            line: raw.line,
            column: raw.column,
            snippet: raw.snippet,
            kind,
        });
    }

    // Tier 3: the rule id has an overwrite entry.
    if let Some(entry) = overwrites.get(raw.rule_id.as_str()) {
        return Ok(CanonicalDiagnostic {
            code: entry
                .code
                .map(str::to_string)
                .unwrap_or_else(|| message.clone()),
            message: entry
                .message
                .map(str::to_string)
                .unwrap_or_else(|| message.clone()),
            description: entry
                .description
                .map(str::to_string)
                .or(raw.description),
            file: filename.to_string(),
            line: raw.line,
            column: raw.column,
            snippet: raw.snippet,
            kind,
        });
    }

    // Tier 4: pass the raw message through verbatim.
    Ok(CanonicalDiagnostic {
        code: message.clone(),
        message,
        description: None,
        file: filename.to_string(),
        line: raw.line,
        column: raw.column,
        snippet: raw.snippet,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{self, CatalogEntry, OverwriteEntry};
    use std::collections::HashMap;

    fn raw(rule_id: &str, message: Option<&str>) -> RawFinding {
        RawFinding {
            rule_id: rule_id.to_string(),
            message: message.map(str::to_string),
            description: None,
            severity: 2,
            line: 3,
            column: 7,
            snippet: Some("eval(x);".to_string()),
            fatal: false,
        }
    }

    #[test]
    fn test_catalog_message_resolves_to_catalog_entry() {
        let diag = normalize(
            raw("dangerous-eval", Some("DANGEROUS_EVAL")),
            "bg.js",
            messages::catalog(),
            messages::overwrites(),
        )
        .expect("normalize");
        assert_eq!(diag.code, "DANGEROUS_EVAL");
        assert_eq!(diag.message, "The use of eval() is strongly discouraged");
        assert!(diag.description.is_some());
        assert_eq!(diag.kind, DiagnosticKind::Error);
        assert_eq!((diag.line, diag.column), (3, 7));
    }

    #[test]
    fn test_catalog_wins_over_overwrite_for_same_rule() {
        // A rule covered by the overwrite table whose message happens to
        // be a catalog code resolves through the catalog (tier 2 before
        // tier 3).
        let diag = normalize(
            raw("no-implied-eval", Some("DANGEROUS_EVAL")),
            "bg.js",
            messages::catalog(),
            messages::overwrites(),
        )
        .expect("normalize");
        assert_eq!(diag.code, "DANGEROUS_EVAL");
        assert_eq!(diag.message, "The use of eval() is strongly discouraged");
    }

    #[test]
    fn test_overwrite_remaps_free_form_message() {
        let diag = normalize(
            raw("no-implied-eval", Some("String passed to setTimeout() is compiled as code")),
            "bg.js",
            messages::catalog(),
            messages::overwrites(),
        )
        .expect("normalize");
        assert_eq!(diag.code, "NO_IMPLIED_EVAL");
        assert_eq!(diag.message, "Passing a string to a timer API implies eval()");
    }

    #[test]
    fn test_overwrite_falls_back_to_raw_fields() {
        let catalog: HashMap<&'static str, CatalogEntry> = HashMap::new();
        let overwrites: HashMap<&'static str, OverwriteEntry> =
            HashMap::from([("partial-rule", OverwriteEntry::default())]);
        let mut finding = raw("partial-rule", Some("raw text"));
        finding.description = Some("raw description".to_string());
        let diag = normalize(finding, "bg.js", &catalog, &overwrites).expect("normalize");
        assert_eq!(diag.code, "raw text");
        assert_eq!(diag.message, "raw text");
        assert_eq!(diag.description.as_deref(), Some("raw description"));
    }

    #[test]
    fn test_unknown_message_passes_through() {
        let diag = normalize(
            raw("custom-rule", Some("Something looked off")),
            "bg.js",
            messages::catalog(),
            messages::overwrites(),
        )
        .expect("normalize");
        assert_eq!(diag.code, "Something looked off");
        assert_eq!(diag.message, "Something looked off");
        assert!(diag.description.is_none());
    }

    #[test]
    fn test_fatal_always_reports_reserved_code() {
        let mut finding = raw("parse", Some("Parsing error at line 1 column 9"));
        finding.fatal = true;
        let diag = normalize(finding, "bg.js", messages::catalog(), messages::overwrites())
            .expect("normalize");
        assert_eq!(diag.code, JS_SYNTAX_ERROR);
        assert_eq!(diag.message, "JavaScript syntax error");
    }

    #[test]
    fn test_missing_message_is_contract_violation() {
        let err = normalize(
            raw("broken-rule", None),
            "bg.js",
            messages::catalog(),
            messages::overwrites(),
        )
        .expect_err("must fail");
        assert!(matches!(
            err,
            ScanError::RuleContractViolation { ref rule_id } if rule_id == "broken-rule"
        ));
    }

    #[test]
    fn test_severity_maps_to_kind() {
        let mut finding = raw("no-document-write", Some("NO_DOCUMENT_WRITE"));
        finding.severity = 1;
        let diag = normalize(finding, "bg.js", messages::catalog(), messages::overwrites())
            .expect("normalize");
        assert_eq!(diag.kind, DiagnosticKind::Warning);
    }
}
