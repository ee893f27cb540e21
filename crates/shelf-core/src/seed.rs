//! The seed catalog document and the built-in fallback collections.
//!
//! A new user's catalog is populated from a static JSON document shaped as
//!
//! ```json
//! { "authors": [{"id": 1, "name": "..", "note": ".."}],
//!   "books":   [{"id": 1, "title": "..", "authorId": 1, "note": ".."}] }
//! ```
//!
//! Either array may be absent, and `note` may be absent or `null`. When the
//! document cannot be obtained at all, the stores fall back to
//! [`fallback_authors`] and [`fallback_books`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Author, Book};
use crate::error::{CoreError, Result};
use crate::types::{AuthorId, BookId};

/// The static initial dataset for a new user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCatalog {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub books: Vec<Book>,
}

impl SeedCatalog {
    /// Parse a seed document from raw JSON bytes.
    ///
    /// The top level must be a JSON object; arrays are rejected even though
    /// serde would otherwise read them positionally.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(CoreError::MalformedSeed)?;
        if !value.is_object() {
            return Err(CoreError::MalformedSeed(serde::de::Error::custom(
                "seed document must be a JSON object",
            )));
        }
        serde_json::from_value(value).map_err(CoreError::MalformedSeed)
    }

    /// Drop records whose id repeats an earlier one in the same array.
    ///
    /// Stores assume ids are unique within a collection, so a document that
    /// repeats an id keeps only its first record under that id.
    pub fn without_duplicate_ids(mut self) -> Self {
        let mut seen = HashSet::new();
        self.authors.retain(|a| seen.insert(a.id.get()));
        seen.clear();
        self.books.retain(|b| seen.insert(b.id.get()));
        self
    }

    /// The built-in catalog used when no seed document is reachable.
    pub fn fallback() -> Self {
        Self {
            authors: fallback_authors(),
            books: fallback_books(),
        }
    }
}

/// Authors adopted when the seed document cannot be loaded.
pub fn fallback_authors() -> Vec<Author> {
    vec![
        Author::new(AuthorId(1), "J.K. Rowling", ""),
        Author::new(AuthorId(2), "George R.R. Martin", ""),
    ]
}

/// Books adopted when the seed document cannot be loaded.
pub fn fallback_books() -> Vec<Book> {
    vec![
        Book::new(BookId(1), "Harry Potter", AuthorId(1), ""),
        Book::new(BookId(2), "Game of Thrones", AuthorId(2), ""),
    ]
}
