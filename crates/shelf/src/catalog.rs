//! The Catalog: the three stores wired around one storage backend.

use std::sync::Arc;

use shelf_store::{BlobStore, SqliteStore};
use tracing::info;

use crate::auth::{AuthStore, CatalogBooks};
use crate::authors::AuthorsStore;
use crate::books::BooksStore;
use crate::config::{CatalogConfig, DatabaseLocation};
use crate::error::Result;
use crate::seed::SeedSource;

/// The main Catalog struct.
///
/// Owns one instance of each store. The books store reads from the authors
/// store; the auth store binds and resets both. Nothing is loaded on
/// construction: call [`AuthStore::initialize`] once at startup.
pub struct Catalog<S: BlobStore> {
    /// The storage backend.
    store: Arc<S>,
    authors: Arc<AuthorsStore<S>>,
    books: Arc<CatalogBooks<S>>,
    auth: AuthStore<S>,
}

impl<S: BlobStore> Catalog<S> {
    /// Wire a catalog over `store`, seeding new users from `seed`.
    pub fn new(store: S, seed: Arc<dyn SeedSource>) -> Self {
        Self::from_shared(Arc::new(store), seed)
    }

    /// Wire a catalog over a store shared with other owners.
    pub fn from_shared(store: Arc<S>, seed: Arc<dyn SeedSource>) -> Self {
        let authors = Arc::new(AuthorsStore::new(Arc::clone(&store), Arc::clone(&seed)));
        let books = Arc::new(BooksStore::new(
            Arc::clone(&store),
            seed,
            Arc::clone(&authors),
        ));
        let auth = AuthStore::new(Arc::clone(&store), Arc::clone(&authors), Arc::clone(&books));

        Self {
            store,
            authors,
            books,
            auth,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn auth(&self) -> &AuthStore<S> {
        &self.auth
    }

    pub fn authors(&self) -> &AuthorsStore<S> {
        &self.authors
    }

    pub fn books(&self) -> &CatalogBooks<S> {
        &self.books
    }
}

impl Catalog<SqliteStore> {
    /// Open a SQLite-backed catalog as configured.
    pub fn open(config: &CatalogConfig) -> Result<Self> {
        let store = match &config.database {
            DatabaseLocation::Memory => SqliteStore::open_memory()?,
            DatabaseLocation::Path(path) => SqliteStore::open(path)?,
        };
        info!(database = ?config.database, "catalog opened");
        Ok(Self::new(store, config.seed.source()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedLocation;
    use shelf_core::{AuthorId, Route};

    #[tokio::test]
    async fn test_open_in_memory() {
        let config = CatalogConfig::default().with_seed(SeedLocation::Builtin);
        let catalog = Catalog::open(&config).unwrap();

        catalog.auth().initialize().await.unwrap();
        let route = catalog.auth().register("ann@x.com", "pw").await.unwrap();
        assert_eq!(route, Route::Books);

        let books = catalog.books().fetch_books().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(
            books[0].author.as_ref().map(|a| a.id),
            Some(AuthorId(1))
        );
    }

    #[tokio::test]
    async fn test_reopen_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::default()
            .with_database_path(dir.path().join("shelf.db"))
            .with_seed(SeedLocation::Builtin);

        {
            let catalog = Catalog::open(&config).unwrap();
            catalog.auth().register("ann@x.com", "pw").await.unwrap();
            catalog
                .authors()
                .create_author("Iain M. Banks", "Culture", "ann@x.com")
                .await
                .unwrap();
        }

        let catalog = Catalog::open(&config).unwrap();
        catalog.auth().initialize().await.unwrap();
        assert!(catalog.auth().is_authenticated());
        assert_eq!(
            catalog.authors().fetch_author(AuthorId(3)).unwrap().name,
            "Iain M. Banks"
        );
    }
}
