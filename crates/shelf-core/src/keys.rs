//! Durable storage key layout.
//!
//! Two global keys hold the user table and the session marker. Each user's
//! authors and books live under keys suffixed with that user's email, so
//! one user's collections are never visible under another user's keys.

/// The registered-user table.
pub const USERS_KEY: &str = "users";

/// The session marker of the authenticated user.
pub const SESSION_KEY: &str = "auth";

const AUTHORS_PREFIX: &str = "authors:";
const BOOKS_PREFIX: &str = "books:";

/// Key of `email`'s author collection.
pub fn authors_key(email: &str) -> String {
    format!("{AUTHORS_PREFIX}{email}")
}

/// Key of `email`'s book collection.
pub fn books_key(email: &str) -> String {
    format!("{BOOKS_PREFIX}{email}")
}
