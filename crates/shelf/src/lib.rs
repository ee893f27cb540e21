//! # Shelf
//!
//! The state layer of a small library catalog: users register and log in,
//! then manage their own authors and books, persisted per user and seeded
//! from a static catalog on first use.
//!
//! ## Overview
//!
//! Three cooperating stores make up the catalog:
//!
//! - [`AuthStore`] - The user table and the session; binds the other two
//!   stores to the signed-in user and resets them on logout
//! - [`AuthorsStore`] - The active user's authors
//! - [`BooksStore`] - The active user's books; every book references an
//!   author, checked through the [`AuthorDirectory`] capability
//!
//! [`Catalog`] wires them around one [`BlobStore`](shelf_store::BlobStore).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shelf::{Catalog, CatalogConfig};
//! use shelf::core::AuthorId;
//!
//! async fn example() {
//!     let config = CatalogConfig::default().with_log_level("shelf=debug");
//!     config.init_logging().unwrap();
//!     let catalog = Catalog::open(&config).unwrap();
//!
//!     // Restore a previous session, if any
//!     catalog.auth().initialize().await.unwrap();
//!
//!     // Sign up; seeds the user's catalog
//!     catalog.auth().register("ann@example.com", "hunter2").await.unwrap();
//!
//!     let author = catalog
//!         .authors()
//!         .create_author("Ursula K. Le Guin", "", "ann@example.com")
//!         .await
//!         .unwrap();
//!     catalog
//!         .books()
//!         .create_book("The Dispossessed", author.id, "")
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Known Limitations
//!
//! - Passwords are stored and compared in plain text.
//! - Deleting an author does not touch books that reference it; such books
//!   read back with no author.
//! - Writes are not transactional. A failed write is logged and memory keeps
//!   the change.
//!
//! ## Re-exports
//!
//! - `shelf::core` - Data model (Author, Book, User, Route, ...)
//! - `shelf::store` - Storage abstraction and SQLite

pub mod auth;
pub mod authors;
pub mod books;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod seed;

// Re-export component crates
pub use shelf_core as core;
pub use shelf_store as store;

// Re-export main types for convenience
pub use auth::{AuthStore, CatalogBooks};
pub use authors::AuthorsStore;
pub use books::BooksStore;
pub use catalog::Catalog;
pub use config::{CatalogConfig, DatabaseLocation, SeedLocation};
pub use directory::AuthorDirectory;
pub use error::{CatalogError, Result, SeedError};
pub use seed::{BuiltinSeedSource, FileSeedSource, SeedOutcome, SeedSource, StaticSeedSource};

#[cfg(feature = "http")]
pub use seed::HttpSeedSource;

// Re-export commonly used core types
pub use shelf_core::{
    Author, AuthorId, Book, BookId, BookWithAuthor, Profile, Route, SeedCatalog, Session, User,
};
