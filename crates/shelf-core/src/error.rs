//! Error types for the catalog core.

use thiserror::Error;

/// Errors raised while decoding catalog documents.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed seed catalog: {0}")]
    MalformedSeed(#[source] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
