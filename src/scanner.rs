//! Scan orchestration
//!
//! One `JavaScriptScanner` instance processes source units synchronously,
//! start to finish: classify the source type, assemble the effective rule
//! set, make the single engine call, then normalize every raw finding.
//! Results accumulate across calls on the same instance; each instance's
//! result list is private and must not be shared between callers.

use crate::engine::{EngineConfig, RuleEngine, TreeSitterEngine};
use crate::error::ScanError;
use crate::messages;
use crate::models::{ScanResult, SourceUnit};
use crate::normalize::normalize;
use crate::rules::{self, Rule};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, info};

/// Caller-facing options for one scan, as received from the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ScannerOptions {
    /// Comma-separated rule names to disable, or absent.
    pub disabled_rules: Option<String>,
    /// Opaque add-on metadata. The scanner never reads it; the pipeline
    /// caller attaches it to its units via `SourceUnit::with_metadata`.
    pub addon_metadata: Option<JsonValue>,
    /// Opaque listing of files already seen by the pipeline. Reserved for
    /// the pipeline caller; not consumed at this stage.
    pub existing_files: Option<JsonValue>,
}

impl ScannerOptions {
    /// Parse the comma-separated disabled-rules string into a trimmed,
    /// non-empty-filtered ordered list.
    pub fn parsed_disabled_rules(&self) -> Vec<String> {
        self.disabled_rules
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Validate the unit before any scan work happens.
///
/// Run by the pipeline ahead of the scanner proper; a failure here aborts
/// with no partial result.
pub fn validate_filename(unit: &SourceUnit) -> Result<(), ScanError> {
    if unit.filename.is_empty() {
        return Err(ScanError::Configuration(
            "explicit filename required before scanning".to_string(),
        ));
    }
    Ok(())
}

/// Scanner for JavaScript source units inside an extension bundle.
pub struct JavaScriptScanner<E: RuleEngine = TreeSitterEngine> {
    engine: E,
    registry: Vec<Arc<dyn Rule>>,
    result: ScanResult,
}

impl Default for JavaScriptScanner<TreeSitterEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaScriptScanner<TreeSitterEngine> {
    /// Scanner over the built-in registry and the default engine.
    pub fn new() -> Self {
        Self::with_engine(TreeSitterEngine::new())
    }
}

impl<E: RuleEngine> JavaScriptScanner<E> {
    /// Scanner with a caller-supplied engine. The registry is always the
    /// process-wide built-in set.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            registry: rules::builtin_registry(),
            result: ScanResult::default(),
        }
    }

    /// Scan one source unit and fold its diagnostics into the
    /// accumulating result.
    pub fn scan(&mut self, unit: &SourceUnit) -> Result<&ScanResult, ScanError> {
        validate_filename(unit)?;

        let source_type = crate::source_type::classify(&unit.code);
        debug!("{}: classified as {source_type}", unit.filename);

        let effective = rules::exclude(&self.registry, &unit.disabled_rules);
        debug!(
            "{}: {} of {} rules effective",
            unit.filename,
            effective.len(),
            self.registry.len()
        );

        let config = EngineConfig::fixed(source_type);
        let raw_findings =
            self.engine
                .execute(&unit.code, &unit.filename, &effective, &config)?;

        // Normalize the whole batch before touching the accumulating
        // result: a contract violation aborts the scan with no partial
        // state committed.
        let mut diagnostics = Vec::with_capacity(raw_findings.len());
        for raw in raw_findings {
            diagnostics.push(normalize(
                raw,
                &unit.filename,
                messages::catalog(),
                messages::overwrites(),
            )?);
        }
        self.result.diagnostics.extend(diagnostics);
        self.result.scanned_files.insert(unit.filename.clone());

        info!(
            "{}: scan complete, {} diagnostic(s) accumulated",
            unit.filename,
            self.result.diagnostics.len()
        );
        Ok(&self.result)
    }

    /// The accumulated result so far.
    pub fn result(&self) -> &ScanResult {
        &self.result
    }

    /// Take the accumulated result, leaving the scanner empty. Long-lived
    /// callers use this to bound growth between batches.
    pub fn take_result(&mut self) -> ScanResult {
        std::mem::take(&mut self.result)
    }
}
