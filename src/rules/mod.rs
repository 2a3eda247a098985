//! Built-in analysis rules
//!
//! A rule inspects the parsed source and emits raw findings. The built-in
//! registry is assembled once per scan minus whatever the caller disabled;
//! the engine then runs each surviving rule in registry order.
//!
//! Rules report either a canonical catalog code or free-form text as their
//! message. Free-form rules are remapped by the overwrite table during
//! normalization, so every finding ends up in the same diagnostic shape.

mod dangerous_eval;
mod document_write;
mod implied_eval;
mod unsafe_assignment;

pub use dangerous_eval::DangerousEval;
pub use document_write::DocumentWrite;
pub use implied_eval::ImpliedEval;
pub use unsafe_assignment::UnsafeAssignment;

use crate::engine::RuleContext;
use crate::models::RawFinding;
use anyhow::Result;
use std::sync::Arc;

/// Trait for all scanner rules.
pub trait Rule: Send + Sync {
    /// Unique rule name, used for registration and exclusion.
    fn name(&self) -> &'static str;

    /// Human-readable description of what this rule finds.
    fn description(&self) -> &'static str;

    /// Inspect the parsed source and return raw findings.
    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RawFinding>>;
}

/// The built-in rule registry, in registration order.
pub fn builtin_registry() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(DangerousEval),
        Arc::new(ImpliedEval),
        Arc::new(UnsafeAssignment),
        Arc::new(DocumentWrite),
    ]
}

/// Return `registry` minus every rule whose name appears in `excluded`.
///
/// The input is not mutated; unknown names are silently ignored and
/// duplicates have no additional effect. Surviving rules keep their
/// relative order.
pub fn exclude(registry: &[Arc<dyn Rule>], excluded: &[String]) -> Vec<Arc<dyn Rule>> {
    registry
        .iter()
        .filter(|rule| !excluded.iter().any(|name| name == rule.name()))
        .cloned()
        .collect()
}
