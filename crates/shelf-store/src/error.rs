//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A value could not be encoded or decoded as JSON.
    #[error("serialization error at key {key}: {message}")]
    Serialization { key: String, message: String },

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("connection lock poisoned: {0}")]
    Poisoned(String),

    /// The blocking task running a query failed to complete.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The backend refused the write (quota, read-only media).
    #[error("write rejected at key {0}")]
    WriteRejected(String),

    /// The filesystem or device under the store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether the stored value exists but does not decode.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Serialization { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
