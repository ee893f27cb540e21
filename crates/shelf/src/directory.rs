//! The author lookup capability the books store depends on.

use async_trait::async_trait;
use shelf_core::{Author, AuthorId};

use crate::error::Result;

/// Read access to the active user's authors.
///
/// [`BooksStore`](crate::BooksStore) validates and resolves author
/// references through this trait instead of reaching for a concrete
/// authors store, so it can be exercised against a fake in tests.
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    /// Look up an author by id in the current collection.
    fn find_author(&self, id: AuthorId) -> Option<Author>;

    /// Whether the current collection holds no authors.
    fn is_empty(&self) -> bool;

    /// Load `email`'s authors if the collection is empty.
    async fn ensure_loaded(&self, email: &str) -> Result<()>;
}
