//! Sample seed documents.
//!
//! Each document records what a store should end up with when a new user is
//! seeded from it: the given number of records, or the built-in fallback.

use std::io::Write;
use std::path::{Path, PathBuf};

use shelf_core::{CoreError, SeedCatalog};

/// A sample seed document.
#[derive(Debug, Clone)]
pub struct SeedDocument {
    /// Human-readable name for the document.
    pub name: &'static str,
    /// Raw JSON body.
    pub body: &'static str,
    /// Authors seeded from the document, or `None` if it must fall back.
    pub expected_authors: Option<usize>,
    /// Books seeded from the document, or `None` if it must fall back.
    pub expected_books: Option<usize>,
}

impl SeedDocument {
    /// Whether seeding from this document falls back to the built-in data.
    pub fn falls_back(&self) -> bool {
        self.expected_authors.is_none()
    }

    pub fn parse(&self) -> Result<SeedCatalog, CoreError> {
        SeedCatalog::from_json(self.body.as_bytes())
    }

    /// Write the body to `<dir>/<file_name>` and return the path.
    pub fn write_to(&self, dir: &Path, file_name: &str) -> std::io::Result<PathBuf> {
        let path = dir.join(file_name);
        let mut file = std::fs::File::create(&path)?;
        file.write_all(self.body.as_bytes())?;
        Ok(path)
    }
}

/// A document shaped like the bundled `db.json`.
pub const LIBRARY_DOCUMENT: &str = r#"{
  "authors": [
    { "id": 1, "name": "Ursula K. Le Guin", "note": "Earthsea" },
    { "id": 2, "name": "Octavia E. Butler", "note": "" },
    { "id": 3, "name": "Terry Pratchett", "note": "Discworld" }
  ],
  "books": [
    { "id": 1, "title": "A Wizard of Earthsea", "authorId": 1, "note": "" },
    { "id": 2, "title": "The Dispossessed", "authorId": 1, "note": "Anarres" },
    { "id": 3, "title": "Kindred", "authorId": 2, "note": "" },
    { "id": 4, "title": "Mort", "authorId": 3, "note": "" }
  ]
}"#;

/// Get all sample seed documents.
pub fn all_documents() -> Vec<SeedDocument> {
    vec![
        SeedDocument {
            name: "Full library",
            body: LIBRARY_DOCUMENT,
            expected_authors: Some(3),
            expected_books: Some(4),
        },
        SeedDocument {
            name: "Notes omitted",
            body: r#"{
              "authors": [{ "id": 1, "name": "Iain M. Banks" }],
              "books": [{ "id": 1, "title": "Excession", "authorId": 1 }]
            }"#,
            expected_authors: Some(1),
            expected_books: Some(1),
        },
        SeedDocument {
            name: "Null notes",
            body: r#"{
              "authors": [{ "id": 7, "name": "N. K. Jemisin", "note": null }],
              "books": [{ "id": 9, "title": "The Fifth Season", "authorId": 7, "note": null }]
            }"#,
            expected_authors: Some(1),
            expected_books: Some(1),
        },
        SeedDocument {
            name: "Empty collections",
            body: r#"{ "authors": [], "books": [] }"#,
            expected_authors: Some(0),
            expected_books: Some(0),
        },
        SeedDocument {
            name: "Extra fields ignored",
            body: r#"{
              "authors": [{ "id": 1, "name": "Ted Chiang", "note": "", "born": 1967 }],
              "books": [],
              "version": 2
            }"#,
            expected_authors: Some(1),
            expected_books: Some(0),
        },
        SeedDocument {
            name: "Truncated JSON",
            body: r#"{ "authors": [{ "id": 1, "name": "#,
            expected_authors: None,
            expected_books: None,
        },
        SeedDocument {
            name: "Top-level array",
            body: r#"[{ "id": 1, "name": "Nobody" }]"#,
            expected_authors: None,
            expected_books: None,
        },
        SeedDocument {
            name: "String id",
            body: r#"{ "authors": [{ "id": "one", "name": "Nobody" }], "books": [] }"#,
            expected_authors: None,
            expected_books: None,
        },
    ]
}

/// Check every document parses, or fails to parse, as recorded.
pub fn verify_all_documents() -> Result<(), String> {
    for doc in all_documents() {
        match (doc.parse(), doc.expected_authors, doc.expected_books) {
            (Ok(catalog), Some(authors), Some(books)) => {
                if catalog.authors.len() != authors || catalog.books.len() != books {
                    return Err(format!(
                        "{}: expected {authors} authors and {books} books, got {} and {}",
                        doc.name,
                        catalog.authors.len(),
                        catalog.books.len()
                    ));
                }
            }
            (Err(_), None, _) => {}
            (Ok(_), None, _) => return Err(format!("{}: expected a parse failure", doc.name)),
            (Err(e), Some(_), _) => return Err(format!("{}: {e}", doc.name)),
            (Ok(_), Some(_), None) => {
                return Err(format!("{}: book count missing", doc.name));
            }
        }
    }
    Ok(())
}
