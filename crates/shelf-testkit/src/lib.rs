//! # Shelf Testkit
//!
//! Testing utilities for the Shelf catalog.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Seed documents**: Sample seed JSON with the collections each should produce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A catalog over a store whose writes can be made to fail,
//!   plus fake seed sources and author directories
//!
//! ## Seed Documents
//!
//! ```rust
//! use shelf_testkit::documents::{all_documents, verify_all_documents};
//!
//! verify_all_documents().unwrap();
//! for doc in all_documents() {
//!     println!("{}: falls back = {}", doc.name, doc.falls_back());
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use shelf_testkit::generators::{email, password};
//! use shelf_testkit::TestFixture;
//!
//! proptest! {
//!     #[test]
//!     fn login_after_register(email in email(), password in password()) {
//!         // register, logout, login ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use shelf_testkit::fixtures::TestFixture;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let fixture = TestFixture::signed_in("ann@example.com").await;
//! fixture.store.fail_writes(true);
//! // mutations still succeed in memory
//! # });
//! ```

pub mod documents;
pub mod fixtures;
pub mod generators;

pub use documents::{all_documents, verify_all_documents, SeedDocument, LIBRARY_DOCUMENT};
pub use fixtures::{
    user_emails, CountingSeedSource, FailingSeedSource, FakeAuthors, FlakyStore, TestFixture,
    DEFAULT_PASSWORD,
};
pub use generators::{author_from_params, book_from_params, AuthorOp, AuthorParams, BookParams};
