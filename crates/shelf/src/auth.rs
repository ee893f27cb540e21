//! AuthStore: users, the session, and per-user initialization.
//!
//! The auth store owns the user table and the session marker. Establishing
//! a session binds the authors and books stores to that user; ending it
//! resets both, so a later session for someone else starts from nothing.
//!
//! Passwords are kept and compared in plain text.

use std::sync::{Arc, Mutex, PoisonError};

use shelf_core::{keys, Profile, Route, Session, User};
use shelf_store::{BlobStore, StoreExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::authors::AuthorsStore;
use crate::books::BooksStore;
use crate::error::{CatalogError, Result};

/// The books store as wired to a real authors store.
pub type CatalogBooks<S> = BooksStore<S, AuthorsStore<S>>;

/// Session and user-table owner; orchestrates the dependent stores.
pub struct AuthStore<S: BlobStore> {
    /// Durable storage.
    store: Arc<S>,
    /// Dependent stores, bound on login and reset on logout.
    authors: Arc<AuthorsStore<S>>,
    books: Arc<CatalogBooks<S>>,
    /// The user table, read from storage on first use.
    users: Mutex<Option<Vec<User>>>,
    /// The active session, observable by display bindings.
    session: watch::Sender<Option<Session>>,
}

impl<S: BlobStore> AuthStore<S> {
    pub fn new(store: Arc<S>, authors: Arc<AuthorsStore<S>>, books: Arc<CatalogBooks<S>>) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            store,
            authors,
            books,
            users: Mutex::new(None),
            session,
        }
    }

    /// Observe the session.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .borrow()
            .as_ref()
            .map_or(false, |s| s.authenticated)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth Flow
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a new user and sign them in.
    ///
    /// Fails with [`CatalogError::UserAlreadyExists`] when the email is taken,
    /// leaving the user table untouched. The user is only added once their
    /// collections have loaded.
    pub async fn register(&self, email: &str, password: &str) -> Result<Route> {
        let mut users = self.load_users().await?;
        if users.iter().any(|u| u.email == email) {
            debug!(email, "registration rejected, email taken");
            return Err(CatalogError::UserAlreadyExists);
        }

        self.bind(email).await?;

        users.push(User::new(email, password));
        self.save_users(users).await;
        info!(email, "user registered");

        Ok(self.publish(Session::authenticated(email)).await)
    }

    /// Sign in with an exact email and password match.
    pub async fn login(&self, email: &str, password: &str) -> Result<Route> {
        let users = self.load_users().await?;
        if !users.iter().any(|u| u.matches(email, password)) {
            debug!(email, "login rejected");
            return Err(CatalogError::InvalidCredentials);
        }

        self.bind(email).await?;
        info!(email, "user logged in");
        Ok(self.publish(Session::authenticated(email)).await)
    }

    /// End the session and drop the dependent stores' collections.
    pub async fn logout(&self) -> Route {
        let previous = self.session.send_replace(None);

        if let Err(e) = self.store.remove(keys::SESSION_KEY).await {
            warn!(error = %e, "failed to remove session marker");
        }
        self.authors.reset();
        self.books.reset();

        if let Some(session) = previous {
            info!(email = %session.email, "user logged out");
        }
        Route::Home
    }

    /// Restore the session from its durable marker, if one exists.
    ///
    /// Called once at startup. Without a marker this does nothing; with one
    /// it re-binds the dependent stores, which load what they stored before.
    pub async fn initialize(&self) -> Result<()> {
        let marker: shelf_store::Result<Option<Session>> =
            self.store.get_json(keys::SESSION_KEY).await;

        let session = match marker {
            Ok(Some(session)) if session.authenticated => session,
            Ok(_) => return Ok(()),
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "ignoring unreadable session marker");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.bind(&session.email).await?;
        info!(email = %session.email, "session restored");
        self.session.send_replace(Some(session));
        Ok(())
    }

    /// The signed-in user's profile.
    pub fn get_profile(&self) -> Result<Profile> {
        self.session
            .borrow()
            .as_ref()
            .filter(|s| s.authenticated)
            .map(Session::profile)
            .ok_or(CatalogError::NotAuthenticated)
    }

    /// Gate a navigation target: protected routes need a session.
    pub fn guard(&self, route: Route) -> Route {
        if route.requires_auth() && !self.is_authenticated() {
            debug!(%route, "redirecting unauthenticated navigation");
            Route::Home
        } else {
            route
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist the session marker and make `session` current.
    async fn publish(&self, session: Session) -> Route {
        if let Err(e) = self.store.set_json(keys::SESSION_KEY, &session).await {
            warn!(email = %session.email, error = %e, "failed to persist session marker");
        }
        self.session.send_replace(Some(session));
        Route::Books
    }

    /// Load `email`'s collections into the dependent stores.
    ///
    /// If either fails to load, both stores are reset and any current
    /// session is dropped, leaving the catalog signed out.
    async fn bind(&self, email: &str) -> Result<()> {
        self.authors.reset();
        self.books.reset();

        if let Err(e) = self.load_collections(email).await {
            warn!(email, error = %e, "failed to load collections");
            self.authors.reset();
            self.books.reset();
            self.session.send_replace(None);
            return Err(e);
        }
        Ok(())
    }

    async fn load_collections(&self, email: &str) -> Result<()> {
        self.authors.initialize_authors(email).await?;
        self.books.initialize_books(email).await?;
        Ok(())
    }

    async fn load_users(&self) -> Result<Vec<User>> {
        let cached = self
            .users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(users) = cached {
            return Ok(users);
        }

        let stored: shelf_store::Result<Option<Vec<User>>> =
            self.store.get_json(keys::USERS_KEY).await;
        let users = match stored {
            Ok(users) => users.unwrap_or_default(),
            Err(e) if e.is_corrupt() => return Err(CatalogError::Corrupt(e.to_string())),
            Err(e) => return Err(e.into()),
        };

        *self.users.lock().unwrap_or_else(PoisonError::into_inner) = Some(users.clone());
        Ok(users)
    }

    async fn save_users(&self, users: Vec<User>) {
        if let Err(e) = self.store.set_json(keys::USERS_KEY, &users).await {
            warn!(error = %e, "failed to persist user table");
        }
        *self.users.lock().unwrap_or_else(PoisonError::into_inner) = Some(users);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{BuiltinSeedSource, SeedSource};
    use shelf_core::{AuthorId, BookId};
    use shelf_store::MemoryStore;

    struct Harness {
        blobs: Arc<MemoryStore>,
        authors: Arc<AuthorsStore<MemoryStore>>,
        books: Arc<CatalogBooks<MemoryStore>>,
        auth: AuthStore<MemoryStore>,
    }

    fn harness_on(blobs: Arc<MemoryStore>) -> Harness {
        let seed: Arc<dyn SeedSource> = Arc::new(BuiltinSeedSource);
        let authors = Arc::new(AuthorsStore::new(Arc::clone(&blobs), Arc::clone(&seed)));
        let books = Arc::new(BooksStore::new(Arc::clone(&blobs), seed, Arc::clone(&authors)));
        let auth = AuthStore::new(Arc::clone(&blobs), Arc::clone(&authors), Arc::clone(&books));
        Harness {
            blobs,
            authors,
            books,
            auth,
        }
    }

    fn harness() -> Harness {
        harness_on(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_register_establishes_session() {
        let h = harness();

        let route = h.auth.register("ann@x.com", "pw").await.unwrap();
        assert_eq!(route, Route::Books);
        assert!(h.auth.is_authenticated());
        assert_eq!(h.auth.get_profile().unwrap().email, "ann@x.com");
        assert_eq!(h.authors.owner().as_deref(), Some("ann@x.com"));
        assert_eq!(h.books.owner().as_deref(), Some("ann@x.com"));
        assert_eq!(h.authors.fetch_authors().len(), 2);

        let marker: Option<Session> = h.blobs.get_json(keys::SESSION_KEY).await.unwrap();
        assert_eq!(marker, Some(Session::authenticated("ann@x.com")));
    }

    #[tokio::test]
    async fn test_register_duplicate_leaves_table_unchanged() {
        let h = harness();
        h.auth.register("ann@x.com", "pw").await.unwrap();

        let before: Option<Vec<User>> = h.blobs.get_json(keys::USERS_KEY).await.unwrap();

        let result = h.auth.register("ann@x.com", "other").await;
        assert!(matches!(result, Err(CatalogError::UserAlreadyExists)));

        let after: Option<Vec<User>> = h.blobs.get_json(keys::USERS_KEY).await.unwrap();
        assert_eq!(before, after);
        assert_eq!(after.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_emails_are_case_sensitive() {
        let h = harness();
        h.auth.register("ann@x.com", "pw").await.unwrap();
        h.auth.register("Ann@x.com", "pw").await.unwrap();

        let users: Vec<User> = h.blobs.get_json(keys::USERS_KEY).await.unwrap().unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_login_matches_register_session() {
        let h = harness();
        h.auth.register("ann@x.com", "pw").await.unwrap();
        let registered = h.auth.session();
        h.auth.logout().await;

        let route = h.auth.login("ann@x.com", "pw").await.unwrap();
        assert_eq!(route, Route::Books);
        assert_eq!(h.auth.session(), registered);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let h = harness();
        h.auth.register("ann@x.com", "pw").await.unwrap();
        h.auth.logout().await;

        for (email, password) in [("ann@x.com", "nope"), ("bob@x.com", "pw"), ("ANN@x.com", "pw")] {
            let result = h.auth.login(email, password).await;
            assert!(matches!(result, Err(CatalogError::InvalidCredentials)));
        }
        assert!(!h.auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_resets_dependents() {
        let h = harness();
        h.auth.register("ann@x.com", "pw").await.unwrap();

        let route = h.auth.logout().await;
        assert_eq!(route, Route::Home);
        assert!(h.authors.fetch_authors().is_empty());
        assert!(h.books.fetch_books().await.unwrap().is_empty());
        assert!(matches!(h.auth.get_profile(), Err(CatalogError::NotAuthenticated)));
        assert_eq!(h.blobs.get(keys::SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let h = harness();
        h.auth.register("ann@x.com", "pw").await.unwrap();
        h.authors.create_author("Ann's Author", "", "ann@x.com").await.unwrap();
        h.books
            .create_book("Ann's Book", AuthorId(3), "")
            .await
            .unwrap();
        h.auth.logout().await;

        h.auth.register("bob@x.com", "pw").await.unwrap();
        let authors = h.authors.fetch_authors();
        assert_eq!(authors.len(), 2);
        assert!(authors.iter().all(|a| a.name != "Ann's Author"));
        let books = h.books.fetch_books().await.unwrap();
        assert!(books.iter().all(|b| b.title != "Ann's Book"));

        h.auth.logout().await;
        h.auth.login("ann@x.com", "pw").await.unwrap();
        assert_eq!(h.authors.fetch_author(AuthorId(3)).unwrap().name, "Ann's Author");
        assert_eq!(h.books.fetch_book(BookId(3)).unwrap().title, "Ann's Book");
    }

    #[tokio::test]
    async fn test_initialize_without_marker_is_noop() {
        let h = harness();
        h.auth.initialize().await.unwrap();
        h.auth.initialize().await.unwrap();

        assert!(!h.auth.is_authenticated());
        assert_eq!(h.authors.owner(), None);
        assert!(h.blobs.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_restores_session() {
        let blobs = Arc::new(MemoryStore::new());
        {
            let first = harness_on(Arc::clone(&blobs));
            first.auth.register("ann@x.com", "pw").await.unwrap();
            first.authors.create_author("Kept", "", "ann@x.com").await.unwrap();
        }

        let h = harness_on(blobs);
        assert!(!h.auth.is_authenticated());

        h.auth.initialize().await.unwrap();
        assert_eq!(h.auth.get_profile().unwrap().email, "ann@x.com");
        assert_eq!(h.authors.fetch_author(AuthorId(3)).unwrap().name, "Kept");
        assert_eq!(h.books.owner().as_deref(), Some("ann@x.com"));
    }

    #[tokio::test]
    async fn test_initialize_ignores_unauthenticated_marker() {
        let h = harness();
        h.blobs
            .set(keys::SESSION_KEY, r#"{"email":"ann@x.com","isAuthenticated":false}"#)
            .await
            .unwrap();

        h.auth.initialize().await.unwrap();
        assert!(!h.auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_corrupt_user_table() {
        let h = harness();
        h.blobs.set(keys::USERS_KEY, "{oops").await.unwrap();

        let result = h.auth.register("ann@x.com", "pw").await;
        assert!(matches!(result, Err(CatalogError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_profile_never_exposes_password() {
        let h = harness();
        assert!(matches!(h.auth.get_profile(), Err(CatalogError::NotAuthenticated)));

        h.auth.register("ann@x.com", "secret").await.unwrap();
        let profile = serde_json::to_string(&h.auth.get_profile().unwrap()).unwrap();
        assert!(!profile.contains("secret"));
    }

    #[tokio::test]
    async fn test_guard_redirects_until_signed_in() {
        let h = harness();
        assert_eq!(h.auth.guard(Route::Books), Route::Home);
        assert_eq!(h.auth.guard(Route::Home), Route::Home);

        h.auth.register("ann@x.com", "pw").await.unwrap();
        assert_eq!(h.auth.guard(Route::Books), Route::Books);
        assert_eq!(h.auth.guard(Route::Profile), Route::Profile);
    }

    #[tokio::test]
    async fn test_session_is_observable() {
        let h = harness();
        let mut rx = h.auth.subscribe();
        assert!(rx.borrow_and_update().is_none());

        h.auth.register("ann@x.com", "pw").await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().as_ref().map(|s| s.email.clone()),
            Some("ann@x.com".to_string())
        );
    }
}
