//! addonscan - JavaScript scanner stage for extension-bundle review
//!
//! Classifies each source file as a module or a script, runs the built-in
//! security rules against it through a rule engine with a fixed,
//! non-negotiable configuration, and normalizes every finding into one
//! canonical diagnostic shape regardless of which rule family produced it.

pub mod engine;
pub mod error;
pub mod messages;
pub mod models;
pub mod normalize;
mod parser;
pub mod reporters;
pub mod rules;
pub mod scanner;
pub mod source_type;

pub use error::ScanError;
pub use models::{CanonicalDiagnostic, DiagnosticKind, ScanResult, SourceType, SourceUnit};
pub use scanner::{JavaScriptScanner, ScannerOptions};
