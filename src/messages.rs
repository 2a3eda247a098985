//! Canonical message catalog and per-rule overwrite table
//!
//! Both tables are process-wide constants built once at first use and
//! never mutated, so independent scanner instances can read them
//! concurrently without locking.
//!
//! The catalog maps canonical message codes to their human-readable text.
//! The overwrite table remaps rules whose raw output is not itself a
//! catalog code (typically third-party rules emitting free-form text)
//! onto canonical codes and descriptions.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Reserved code for findings on source the engine could not parse.
pub const JS_SYNTAX_ERROR: &str = "JS_SYNTAX_ERROR";

/// Catalog entry: canonical text for one message code.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub short_description: &'static str,
    pub long_description: &'static str,
}

/// Overwrite entry: optional remappings for one rule id.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverwriteEntry {
    pub code: Option<&'static str>,
    pub message: Option<&'static str>,
    pub description: Option<&'static str>,
}

pub type MessageCatalog = HashMap<&'static str, CatalogEntry>;
pub type OverwriteTable = HashMap<&'static str, OverwriteEntry>;

static CATALOG: LazyLock<MessageCatalog> = LazyLock::new(|| {
    HashMap::from([
        (
            JS_SYNTAX_ERROR,
            CatalogEntry {
                short_description: "JavaScript syntax error",
                long_description:
                    "There is a JavaScript syntax error in your code, which might be \
                     related to some experimental JavaScript features that aren't an \
                     official part of the language specification. The file could not \
                     be analyzed further.",
            },
        ),
        (
            "DANGEROUS_EVAL",
            CatalogEntry {
                short_description: "The use of eval() is strongly discouraged",
                long_description:
                    "Evaluating strings as code can lead to arbitrary code execution \
                     when any part of the string is attacker-controlled. Use JSON \
                     parsing or direct function references instead.",
            },
        ),
        (
            "NO_IMPLIED_EVAL",
            CatalogEntry {
                short_description: "Passing a string to a timer API implies eval()",
                long_description:
                    "setTimeout and setInterval compile string arguments as code, \
                     which carries the same risks as eval(). Pass a function instead.",
            },
        ),
        (
            "UNSAFE_VAR_ASSIGNMENT",
            CatalogEntry {
                short_description: "Unsafe assignment to innerHTML or outerHTML",
                long_description:
                    "Assigning dynamic content to innerHTML or outerHTML can inject \
                     markup and scripts into the page. Use textContent or a \
                     sanitization library.",
            },
        ),
        (
            "NO_DOCUMENT_WRITE",
            CatalogEntry {
                short_description: "Use of document.write is not allowed",
                long_description:
                    "document.write interacts badly with asynchronous loading and can \
                     be used to inject unreviewed markup. Use DOM manipulation APIs \
                     instead.",
            },
        ),
    ])
});

static OVERWRITES: LazyLock<OverwriteTable> = LazyLock::new(|| {
    HashMap::from([(
        "no-implied-eval",
        OverwriteEntry {
            code: Some("NO_IMPLIED_EVAL"),
            message: Some("Passing a string to a timer API implies eval()"),
            description: None,
        },
    )])
});

/// The shared message catalog.
pub fn catalog() -> &'static MessageCatalog {
    &CATALOG
}

/// The shared per-rule overwrite table.
pub fn overwrites() -> &'static OverwriteTable {
    &OVERWRITES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_code_present() {
        assert!(catalog().contains_key(JS_SYNTAX_ERROR));
    }

    #[test]
    fn test_unsafe_assignment_text_covers_both_properties() {
        let entry = catalog()
            .get("UNSAFE_VAR_ASSIGNMENT")
            .expect("catalog entry present");
        assert!(entry.short_description.contains("innerHTML"));
        assert!(entry.short_description.contains("outerHTML"));
    }

    #[test]
    fn test_overwrite_targets_exist_in_catalog() {
        for entry in overwrites().values() {
            if let Some(code) = entry.code {
                assert!(
                    catalog().contains_key(code),
                    "overwrite code {code} missing from catalog"
                );
            }
        }
    }
}
