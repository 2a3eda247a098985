//! Scanner error taxonomy
//!
//! Only two conditions abort a scan abnormally: a missing filename caught
//! before any scan work, and a rule emitting a finding without a message.
//! Unparseable source is not an error at this layer; it becomes a normal
//! diagnostic carrying the reserved syntax-error code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan was misconfigured by the caller. Detected before any scan
    /// work starts; no partial result is produced.
    #[error("scanner configuration error: {0}")]
    Configuration(String),

    /// A rule produced a finding without a message. This signals a broken
    /// rule extension, not a problem with the scanned content, so the
    /// whole scan fails rather than emitting a degraded diagnostic.
    #[error("rule `{rule_id}` reported a finding without a message")]
    RuleContractViolation { rule_id: String },

    /// The rule engine itself failed. Propagated unmodified.
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}
