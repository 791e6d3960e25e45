//! Catalog error types.
//!
//! Load-time errors are fatal to the whole load: a catalog with a bad line
//! is rejected, never partially accepted.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while encoding, decoding, loading or saving switch records.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Returns true if the error came from record syntax rather than the filesystem.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRecord(_))
    }
}
