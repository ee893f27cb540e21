//! Catalog records: authors, books, and the resolved book view.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{AuthorId, BookId};

/// An author in one user's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

impl Author {
    pub fn new(id: AuthorId, name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            note: note.into(),
        }
    }
}

/// A book in one user's catalog.
///
/// This is the durable form: only `id`, `title`, `authorId` and `note` are
/// ever written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author_id: AuthorId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

impl Book {
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author_id: AuthorId,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author_id,
            note: note.into(),
        }
    }
}

/// A book with its author resolved for display.
///
/// `author` is `None` when the book's `author_id` no longer matches any
/// author (a dangling reference). It is recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookWithAuthor {
    #[serde(flatten)]
    pub book: Book,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl BookWithAuthor {
    pub fn new(book: Book, author: Option<Author>) -> Self {
        Self { book, author }
    }

    /// Resolve `book.author_id` with the given lookup.
    pub fn resolve<F>(book: Book, lookup: F) -> Self
    where
        F: FnOnce(AuthorId) -> Option<Author>,
    {
        let author = lookup(book.author_id);
        Self { book, author }
    }

    /// Whether the book's author reference no longer resolves.
    pub fn is_dangling(&self) -> bool {
        self.author.is_none()
    }

    /// Drop the resolved author, keeping the durable record.
    pub fn into_book(self) -> Book {
        self.book
    }
}

impl std::ops::Deref for BookWithAuthor {
    type Target = Book;

    fn deref(&self) -> &Book {
        &self.book
    }
}

/// Missing and `null` notes both become the empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
