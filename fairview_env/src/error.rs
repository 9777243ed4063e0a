//! Error types shared across the FairView crates.

use thiserror::Error;

/// Errors raised by outcome verification and simulation setup.
///
/// Every operation in FairView is deterministic, so none of these are
/// transient: retrying with the same input yields the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FairError {
    /// Seed text is not hexadecimal or too short for the extraction step
    #[error("Malformed seed: {0}")]
    MalformedSeed(String),

    /// Interval with `to <= from`, zero outcome count, or similar bad configuration
    #[error("Invalid domain configuration: {0}")]
    InvalidDomainConfig(String),

    /// More distinct draws requested than the domain can supply
    #[error("Draw exhaustion: requested {requested}, only {available} available")]
    DrawExhaustion { requested: usize, available: usize },
}

impl FairError {
    /// Creates a malformed-seed error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSeed(msg.into())
    }

    /// Creates an invalid-domain error.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::InvalidDomainConfig(msg.into())
    }

    /// Creates a draw-exhaustion error.
    pub fn exhausted(requested: usize, available: usize) -> Self {
        Self::DrawExhaustion { requested, available }
    }
}
