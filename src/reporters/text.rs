//! Text reporter
//!
//! One line per diagnostic plus a summary, for terminal use.

use crate::models::ScanResult;
use anyhow::Result;
use std::fmt::Write;

/// Render the result as plain text
pub fn render(result: &ScanResult) -> Result<String> {
    let mut out = String::new();
    for diag in &result.diagnostics {
        writeln!(
            out,
            "{}:{}:{} {} [{}] {}",
            diag.file, diag.line, diag.column, diag.kind, diag.code, diag.message
        )?;
        if let Some(snippet) = &diag.snippet {
            writeln!(out, "    {snippet}")?;
        }
    }
    writeln!(
        out,
        "{} file(s) scanned, {} diagnostic(s), {} error(s)",
        result.scanned_files.len(),
        result.diagnostics.len(),
        result.error_count()
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_text_render_contains_location_and_code() {
        let text = render(&test_result()).expect("render text");
        assert!(text.contains("background.js:4:3"));
        assert!(text.contains("DANGEROUS_EVAL"));
        assert!(text.contains("1 file(s) scanned, 1 diagnostic(s), 1 error(s)"));
    }

    #[test]
    fn test_text_render_empty() {
        let text = render(&ScanResult::default()).expect("render text");
        assert!(text.contains("0 file(s) scanned"));
    }
}
