//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use shelf::{
    AuthStore, AuthorDirectory, AuthorsStore, BuiltinSeedSource, Catalog, CatalogBooks,
    CatalogError, SeedError, SeedSource,
};
use shelf_core::{Author, AuthorId, SeedCatalog};
use shelf_store::{BlobStore, MemoryStore, Result as StoreResult, StoreError};

/// An in-memory blob store whose writes, and reads under a key prefix, can
/// be switched off.
///
/// While writes are failing, `set` and `remove` return
/// [`StoreError::WriteRejected`] and leave the contents untouched, like a
/// browser store over quota. Failing reads return [`StoreError::Io`], which
/// is not a corruption error and so propagates to callers.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    /// Key prefix whose reads fail.
    fail_reads: RwLock<Option<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or stop rejecting writes.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fail reads of keys starting with `prefix`, or stop failing with `None`.
    pub fn fail_reads_under(&self, prefix: Option<&str>) {
        *self.fail_reads.write().unwrap_or_else(PoisonError::into_inner) =
            prefix.map(str::to_string);
    }

    fn check_read(&self, key: &str) -> StoreResult<()> {
        let failing = self.fail_reads.read().unwrap_or_else(PoisonError::into_inner);
        match failing.as_deref() {
            Some(prefix) if key.starts_with(prefix) => Err(StoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read refused at key {key}"),
            ))),
            _ => Ok(()),
        }
    }

    fn check_write(&self, key: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::WriteRejected(key.to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BlobStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_read(key)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_write(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_write(key)?;
        self.inner.remove(key).await
    }
}

/// A seed source that always fails with the given reason.
#[derive(Debug, Clone)]
pub struct FailingSeedSource {
    reason: String,
}

impl FailingSeedSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SeedSource for FailingSeedSource {
    async fn fetch(&self) -> Result<SeedCatalog, SeedError> {
        Err(SeedError::Unavailable(self.reason.clone()))
    }
}

/// Wraps a seed source and counts how often it is asked.
pub struct CountingSeedSource<T: SeedSource> {
    inner: T,
    fetches: AtomicUsize,
}

impl<T: SeedSource> CountingSeedSource<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetches so far.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: SeedSource> SeedSource for CountingSeedSource<T> {
    async fn fetch(&self) -> Result<SeedCatalog, SeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch().await
    }
}

/// An author directory backed by a plain list, for testing the books store
/// without an authors store.
#[derive(Default)]
pub struct FakeAuthors {
    authors: RwLock<Vec<Author>>,
    loads: AtomicUsize,
    /// What `ensure_loaded` fills an empty directory with.
    on_load: Vec<Author>,
}

impl FakeAuthors {
    pub fn new(authors: Vec<Author>) -> Self {
        Self {
            authors: RwLock::new(authors),
            ..Self::default()
        }
    }

    /// An empty directory that fills itself with `authors` when asked to load.
    pub fn lazy(authors: Vec<Author>) -> Self {
        Self {
            on_load: authors,
            ..Self::default()
        }
    }

    pub fn insert(&self, author: Author) {
        self.authors.write().unwrap().push(author);
    }

    pub fn remove(&self, id: AuthorId) {
        self.authors.write().unwrap().retain(|a| a.id != id);
    }

    /// Number of `ensure_loaded` calls that actually loaded.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorDirectory for FakeAuthors {
    fn find_author(&self, id: AuthorId) -> Option<Author> {
        self.authors.read().unwrap().iter().find(|a| a.id == id).cloned()
    }

    fn is_empty(&self) -> bool {
        self.authors.read().unwrap().is_empty()
    }

    async fn ensure_loaded(&self, _email: &str) -> Result<(), CatalogError> {
        let mut authors = self.authors.write().unwrap();
        if authors.is_empty() {
            authors.extend(self.on_load.iter().cloned());
            self.loads.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// A catalog over a [`FlakyStore`], with the store kept at hand.
pub struct TestFixture {
    pub store: Arc<FlakyStore>,
    pub seed: Arc<dyn SeedSource>,
    pub catalog: Catalog<FlakyStore>,
}

impl TestFixture {
    /// A fixture whose seed is always unavailable, so new users get the
    /// built-in collections.
    pub fn new() -> Self {
        Self::with_seed(Arc::new(BuiltinSeedSource))
    }

    /// A fixture seeding new users from `seed`.
    pub fn with_seed(seed: Arc<dyn SeedSource>) -> Self {
        let store = Arc::new(FlakyStore::new());
        let catalog = Catalog::from_shared(Arc::clone(&store), Arc::clone(&seed));
        Self {
            store,
            seed,
            catalog,
        }
    }

    /// A fresh catalog over the same storage, as after a page reload.
    pub fn reopen(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            seed: Arc::clone(&self.seed),
            catalog: Catalog::from_shared(Arc::clone(&self.store), Arc::clone(&self.seed)),
        }
    }

    /// Register `email` with a fixed password and stay signed in.
    pub async fn signed_in(email: &str) -> Self {
        let fixture = Self::new();
        fixture
            .auth()
            .register(email, DEFAULT_PASSWORD)
            .await
            .expect("registration on an empty store succeeds");
        fixture
    }

    pub fn auth(&self) -> &AuthStore<FlakyStore> {
        self.catalog.auth()
    }

    pub fn authors(&self) -> &AuthorsStore<FlakyStore> {
        self.catalog.authors()
    }

    pub fn books(&self) -> &CatalogBooks<FlakyStore> {
        self.catalog.books()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Password used by [`TestFixture::signed_in`].
pub const DEFAULT_PASSWORD: &str = "correct horse battery staple";

/// Distinct user emails for multi-user tests.
pub fn user_emails(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("user{i}@example.com")).collect()
}
