//! # Shelf Core
//!
//! Pure data model for the Shelf library catalog: users, sessions, authors,
//! books, the seed catalog document, and the durable key layout.
//!
//! This crate contains no I/O and no storage. It is plain data plus the
//! small rules every store shares, such as id allocation.
//!
//! ## Key Types
//!
//! - [`Author`] / [`Book`] - Catalog records, scoped to one user
//! - [`BookWithAuthor`] - A book with its author resolved for display
//! - [`AuthorId`] / [`BookId`] - Collection-local identifiers
//! - [`User`] / [`Session`] / [`Profile`] - Authentication records
//! - [`SeedCatalog`] - The static first-run dataset
//! - [`Route`] - Navigation targets
//!
//! ## Id Allocation
//!
//! New records get `max(existing) + 1`, or `1` in an empty collection.
//! See [`next_id`].

pub mod catalog;
pub mod error;
pub mod keys;
pub mod route;
pub mod seed;
pub mod types;
pub mod user;

pub use catalog::{Author, Book, BookWithAuthor};
pub use error::{CoreError, Result};
pub use route::Route;
pub use seed::{fallback_authors, fallback_books, SeedCatalog};
pub use types::{next_id, AuthorId, BookId};
pub use user::{Profile, Session, User};
