//! AuthorsStore: the active user's author collection.
//!
//! The collection is loaded from the user's namespaced key, or seeded on
//! first use. Every mutation updates memory first and then writes the whole
//! collection back. A failed write is logged and otherwise ignored, so
//! memory and storage may diverge until the next successful write.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use shelf_core::{fallback_authors, keys, Author, AuthorId};
use shelf_store::{BlobStore, StoreExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::directory::AuthorDirectory;
use crate::error::{CatalogError, Result};
use crate::seed::{SeedOutcome, SeedSource};

/// Owned state for one user's authors.
///
/// Constructed once and reused across sessions: `initialize_authors` binds it
/// to a user, `reset` unbinds it and drops the collection.
pub struct AuthorsStore<S: BlobStore> {
    /// Durable storage.
    store: Arc<S>,
    /// First-run seed document.
    seed: Arc<dyn SeedSource>,
    /// Email of the user whose collection is loaded.
    owner: Mutex<Option<String>>,
    /// The collection, observable by display bindings.
    authors: watch::Sender<Vec<Author>>,
}

impl<S: BlobStore> AuthorsStore<S> {
    /// Create an empty, unbound store.
    pub fn new(store: Arc<S>, seed: Arc<dyn SeedSource>) -> Self {
        let (authors, _) = watch::channel(Vec::new());
        Self {
            store,
            seed,
            owner: Mutex::new(None),
            authors,
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
    pub fn subscribe(&self) -> watch::Receiver<Vec<Author>> {
        self.authors.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Load `email`'s authors, seeding them on first use.
    ///
    /// Seed failures never escape: the built-in collection is adopted and
    /// persisted instead, and the outcome says so.
    pub async fn initialize_authors(&self, email: &str) -> Result<SeedOutcome> {
        let key = keys::authors_key(email);

        let stored: shelf_store::Result<Option<Vec<Author>>> = self.store.get_json(&key).await;
        match stored {
            Ok(Some(authors)) => {
                debug!(email, count = authors.len(), "authors loaded");
                self.adopt(email, authors);
                return Ok(SeedOutcome::Loaded);
            }
            Ok(None) => {}
            Err(e) if e.is_corrupt() => {
                warn!(email, error = %e, "stored authors unreadable, reseeding");
            }
            Err(e) => return Err(e.into()),
        }

        let (authors, outcome) = match self.seed.fetch().await {
            Ok(seed) => (seed.without_duplicate_ids().authors, SeedOutcome::Seeded),
            Err(e) => {
                warn!(email, error = %e, "failed to load seed catalog, using built-in authors");
                (
                    fallback_authors(),
                    SeedOutcome::Fallback {
                        reason: e.to_string(),
                    },
                )
            }
        };

        info!(email, count = authors.len(), ?outcome, "authors seeded");
        self.adopt(email, authors);
        self.persist(email).await;
        Ok(outcome)
    }

    /// Unbind from the current user and drop the collection.
    pub fn reset(&self) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.authors.send_replace(Vec::new());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The whole collection.
    pub fn fetch_authors(&self) -> Vec<Author> {
        self.authors.borrow().clone()
    }

    /// One author by id.
    pub fn fetch_author(&self, id: AuthorId) -> Result<Author> {
        self.authors
            .borrow()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(CatalogError::AuthorNotFound(id))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add an author under the next free id.
    pub async fn create_author(&self, name: &str, note: &str, email: &str) -> Result<Author> {
        self.ensure_owner(email)?;

        let id = AuthorId::next_after(self.authors.borrow().iter().map(|a| a.id))
            .ok_or(CatalogError::IdSpaceExhausted)?;
        let author = Author::new(id, name, note);
        self.authors.send_modify(|authors| authors.push(author.clone()));

        debug!(email, author_id = %author.id, "author created");
        self.persist(email).await;
        Ok(author)
    }

    /// Replace an author's name and note. The id never changes.
    pub async fn update_author(
        &self,
        id: AuthorId,
        name: &str,
        note: &str,
        email: &str,
    ) -> Result<Author> {
        self.ensure_owner(email)?;

        let updated = Author::new(id, name, note);
        let found = self.authors.send_if_modified(|authors| {
            match authors.iter_mut().find(|a| a.id == id) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => false,
            }
        });
        if !found {
            return Err(CatalogError::AuthorNotFound(id));
        }

        debug!(email, author_id = %id, "author updated");
        self.persist(email).await;
        Ok(updated)
    }

    /// Remove an author. Books referencing it are left dangling.
    pub async fn delete_author(&self, id: AuthorId, email: &str) -> Result<()> {
        self.ensure_owner(email)?;

        let found = self.authors.send_if_modified(|authors| {
            match authors.iter().position(|a| a.id == id) {
                Some(index) => {
                    authors.remove(index);
                    true
                }
                None => false,
            }
        });
        if !found {
            return Err(CatalogError::AuthorNotFound(id));
        }

        debug!(email, author_id = %id, "author deleted");
        self.persist(email).await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn adopt(&self, email: &str, authors: Vec<Author>) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = Some(email.to_string());
        self.authors.send_replace(authors);
    }

    fn ensure_owner(&self, email: &str) -> Result<()> {
        match self.owner() {
            Some(owner) if owner == email => Ok(()),
            Some(owner) => Err(CatalogError::OwnerMismatch {
                owner,
                email: email.to_string(),
            }),
            None => Err(CatalogError::NotAuthenticated),
        }
    }

    /// Write the collection under `email`'s key.
    async fn persist(&self, email: &str) {
        let snapshot = self.fetch_authors();
        let key = keys::authors_key(email);
        if let Err(e) = self.store.set_json(&key, &snapshot).await {
            warn!(email, error = %e, "failed to persist authors");
        }
    }
}

#[async_trait]
impl<S: BlobStore> AuthorDirectory for AuthorsStore<S> {
    fn find_author(&self, id: AuthorId) -> Option<Author> {
        self.fetch_author(id).ok()
    }

    fn is_empty(&self) -> bool {
        self.authors.borrow().is_empty()
    }

    async fn ensure_loaded(&self, email: &str) -> Result<()> {
        let empty = self.authors.borrow().is_empty();
        if empty {
            self.initialize_authors(email).await?;
        }
        Ok(())
    }
}
