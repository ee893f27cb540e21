//! # Shelf Store
//!
//! Storage abstraction for the Shelf catalog. Provides a trait-based interface
//! for durable string-keyed JSON blobs with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The catalog keeps its state the way a browser keeps local storage: one
//! JSON document per key. The [`BlobStore`] trait abstracts that model,
//! allowing the catalog stores to be storage-agnostic. The primary
//! implementation is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`BlobStore`] - The async trait for all storage operations
//! - [`StoreExt`] - Typed JSON helpers over any `BlobStore`
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shelf_store::{SqliteStore, StoreExt};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("shelf.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     store.set_json("users", &Vec::<String>::new()).await.unwrap();
//!     let users: Option<Vec<String>> = store.get_json("users").await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Last write wins**: concurrent writers to one key are not coordinated
//! - **No transactions**: each `set` stands alone

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{BlobStore, StoreExt};

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
