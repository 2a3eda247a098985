//! JSON reporter
//!
//! Outputs the full scan result as pretty-printed JSON, suitable for
//! piping into the report aggregator or jq.

use crate::models::ScanResult;
use anyhow::Result;

/// Render the result as JSON
pub fn render(result: &ScanResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
