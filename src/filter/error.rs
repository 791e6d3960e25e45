//! Filter error types.
//!
//! These are faults, not rejections: a request that fails validation is a
//! [`ValidationOutcome::Rejected`](super::ValidationOutcome) value.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the filter from reaching a verdict.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read request body: {0}")]
    Body(#[source] std::io::Error),

    #[error("Invalid blocklist: {0}")]
    InvalidBlocklist(String),
}

impl FilterError {
    /// Returns true if this error indicates a deployment mistake rather than
    /// a runtime I/O failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
