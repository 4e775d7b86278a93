//! User-facing parse failure

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A command line the host rejected as malformed user input.
///
/// The reason is the host's own syntax-error text, carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{reason}")]
pub struct ParseFailure {
    reason: String,
}

impl ParseFailure {
    /// Create a parse failure with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Human-readable reason
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
