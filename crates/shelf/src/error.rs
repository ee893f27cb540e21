//! Error types for the catalog stores.

use shelf_core::{AuthorId, BookId, CoreError};
use shelf_store::StoreError;
use thiserror::Error;

/// Errors that can occur during catalog operations.
///
/// Every error is scoped to the operation that raised it; none leaves the
/// stores in a state that later operations cannot use.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Registration with an email that is already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// No user matches both email and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The operation needs an authenticated session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The store is loaded for another user than the one named in the call.
    #[error("store belongs to {owner}, not {email}")]
    OwnerMismatch { owner: String, email: String },

    /// Author not found in the active user's collection.
    #[error("author not found: {0}")]
    AuthorNotFound(AuthorId),

    /// Book not found in the active user's collection.
    #[error("book not found: {0}")]
    BookNotFound(BookId),

    /// The collection already holds the largest representable id.
    #[error("no id left to allocate")]
    IdSpaceExhausted,

    /// Durable state exists but cannot be decoded.
    #[error("corrupt durable state: {0}")]
    Corrupt(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Whether this is an auth-flow violation to be shown as a form message
    /// rather than reported as a system failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            CatalogError::UserAlreadyExists
                | CatalogError::InvalidCredentials
                | CatalogError::NotAuthenticated
        )
    }
}

/// Errors obtaining the seed catalog. Never escapes the stores: a failed
/// seed is replaced by the built-in fallback.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed document could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The seed document is not a valid catalog.
    #[error("{0}")]
    Malformed(#[from] CoreError),

    /// The seed server answered with a non-success status.
    #[error("HTTP error! Status: {0}")]
    Status(u16),

    /// The seed request failed in transport.
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No seed source is reachable.
    #[error("seed source unavailable: {0}")]
    Unavailable(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
