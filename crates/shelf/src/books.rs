//! BooksStore: the active user's book collection.
//!
//! Every book references an author by id. The reference is checked against
//! the [`AuthorDirectory`] when a book is created or updated, and resolved
//! again on every read. Deleting an author later leaves its books dangling;
//! reads then return them with no author rather than failing.

use std::sync::{Arc, Mutex, PoisonError};

use shelf_core::{fallback_books, keys, Author, AuthorId, Book, BookId, BookWithAuthor};
use shelf_store::{BlobStore, StoreExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::directory::AuthorDirectory;
use crate::error::{CatalogError, Result};
use crate::seed::{SeedOutcome, SeedSource};

/// Owned state for one user's books.
pub struct BooksStore<S: BlobStore, D: AuthorDirectory> {
    /// Durable storage.
    store: Arc<S>,
    /// First-run seed document.
    seed: Arc<dyn SeedSource>,
    /// Author lookups for validation and display.
    authors: Arc<D>,
    /// Email of the user whose collection is loaded.
    owner: Mutex<Option<String>>,
    /// The collection in durable form, observable by display bindings.
    books: watch::Sender<Vec<Book>>,
}

impl<S: BlobStore, D: AuthorDirectory> BooksStore<S, D> {
    /// Create an empty, unbound store.
    pub fn new(store: Arc<S>, seed: Arc<dyn SeedSource>, authors: Arc<D>) -> Self {
        let (books, _) = watch::channel(Vec::new());
        Self {
            store,
            seed,
            authors,
            owner: Mutex::new(None),
            books,
        }
    }

    /// Email of the user this store is bound to.
    pub fn owner(&self) -> Option<String> {
        self.owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Observe the collection.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Book>> {
        self.books.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Load `email`'s books, seeding them on first use.
    ///
    /// Seed books are taken as-is; their author references are not checked.
    pub async fn initialize_books(&self, email: &str) -> Result<SeedOutcome> {
        let key = keys::books_key(email);

        let stored: shelf_store::Result<Option<Vec<Book>>> = self.store.get_json(&key).await;
        match stored {
            Ok(Some(books)) => {
                debug!(email, count = books.len(), "books loaded");
                self.adopt(email, books);
                return Ok(SeedOutcome::Loaded);
            }
            Ok(None) => {}
            Err(e) if e.is_corrupt() => {
                warn!(email, error = %e, "stored books unreadable, reseeding");
            }
            Err(e) => return Err(e.into()),
        }

        let (books, outcome) = match self.seed.fetch().await {
            Ok(seed) => (seed.without_duplicate_ids().books, SeedOutcome::Seeded),
            Err(e) => {
                warn!(email, error = %e, "failed to load seed catalog, using built-in books");
                (
                    fallback_books(),
                    SeedOutcome::Fallback {
                        reason: e.to_string(),
                    },
                )
            }
        };

        info!(email, count = books.len(), ?outcome, "books seeded");
        self.adopt(email, books);
        self.persist().await;
        Ok(outcome)
    }

    /// Unbind from the current user and drop the collection.
    pub fn reset(&self) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.books.send_replace(Vec::new());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Every book with its author freshly resolved.
    ///
    /// Loads the owner's authors first if the directory is empty.
    pub async fn fetch_books(&self) -> Result<Vec<BookWithAuthor>> {
        if let Some(owner) = self.owner() {
            self.authors.ensure_loaded(&owner).await?;
        }

        let books = self.books.borrow().clone();
        Ok(books.into_iter().map(|book| self.resolve(book)).collect())
    }

    /// One book with its author resolved.
    pub fn fetch_book(&self, id: BookId) -> Result<BookWithAuthor> {
        let book = self
            .books
            .borrow()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or(CatalogError::BookNotFound(id))?;
        Ok(self.resolve(book))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a book under the next free id. The author must exist.
    pub async fn create_book(
        &self,
        title: &str,
        author_id: AuthorId,
        note: &str,
    ) -> Result<BookWithAuthor> {
        let owner = self.require_owner()?;
        let author = self.require_author(author_id)?;

        let id = BookId::next_after(self.books.borrow().iter().map(|b| b.id))
            .ok_or(CatalogError::IdSpaceExhausted)?;
        let book = Book::new(id, title, author_id, note);
        self.books.send_modify(|books| books.push(book.clone()));

        debug!(email = %owner, book_id = %book.id, author_id = %author_id, "book created");
        self.persist().await;
        Ok(BookWithAuthor::new(book, Some(author)))
    }

    /// Replace a book's fields. The id never changes; the new author must exist.
    pub async fn update_book(
        &self,
        id: BookId,
        title: &str,
        author_id: AuthorId,
        note: &str,
    ) -> Result<BookWithAuthor> {
        let owner = self.require_owner()?;
        let author = self.require_author(author_id)?;

        let updated = Book::new(id, title, author_id, note);
        let found = self.books.send_if_modified(|books| {
            match books.iter_mut().find(|b| b.id == id) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => false,
            }
        });
        if !found {
            return Err(CatalogError::BookNotFound(id));
        }

        debug!(email = %owner, book_id = %id, author_id = %author_id, "book updated");
        self.persist().await;
        Ok(BookWithAuthor::new(updated, Some(author)))
    }

    /// Remove a book.
    pub async fn delete_book(&self, id: BookId) -> Result<()> {
        let owner = self.require_owner()?;

        let found = self.books.send_if_modified(|books| {
            match books.iter().position(|b| b.id == id) {
                Some(index) => {
                    books.remove(index);
                    true
                }
                None => false,
            }
        });
        if !found {
            return Err(CatalogError::BookNotFound(id));
        }

        debug!(email = %owner, book_id = %id, "book deleted");
        self.persist().await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn adopt(&self, email: &str, books: Vec<Book>) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = Some(email.to_string());
        self.books.send_replace(books);
    }

    fn resolve(&self, book: Book) -> BookWithAuthor {
        BookWithAuthor::resolve(book, |id| self.authors.find_author(id))
    }

    fn require_owner(&self) -> Result<String> {
        self.owner().ok_or(CatalogError::NotAuthenticated)
    }

    fn require_author(&self, id: AuthorId) -> Result<Author> {
        self.authors
            .find_author(id)
            .ok_or(CatalogError::AuthorNotFound(id))
    }

    /// Write the durable form of the collection under the owner's key.
    async fn persist(&self) {
        let Some(email) = self.owner() else {
            return;
        };
        let snapshot = self.books.borrow().clone();
        if let Err(e) = self.store.set_json(&keys::books_key(&email), &snapshot).await {
            warn!(email = %email, error = %e, "failed to persist books");
        }
    }
}
