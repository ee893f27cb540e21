//! Proptest generators for property-based testing.

use proptest::prelude::*;

use shelf_core::{Author, AuthorId, Book, BookId};

/// Generate a plausible email address.
pub fn email() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9.]{0,15}", "[a-z]{1,10}", "(com|org|net|io)")
        .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
}

/// Generate a password. Any non-empty printable string will do.
pub fn password() -> impl Strategy<Value = String> {
    "[ -~]{1,32}".prop_map(String::from)
}

/// Generate an author name.
pub fn author_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,12}( [A-Z]\\.)?( [A-Z][a-z]{1,12})?".prop_map(String::from)
}

/// Generate a book title.
pub fn book_title() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{0,10}( [a-z]{1,10}){0,4}".prop_map(String::from)
}

/// Generate a free-text note, often empty.
pub fn note() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ -~]{0,64}".prop_map(String::from),
    ]
}

/// Generate an id in the range a small collection actually uses.
pub fn small_id() -> impl Strategy<Value = u64> {
    1u64..=20u64
}

/// Parameters for creating an author.
#[derive(Debug, Clone)]
pub struct AuthorParams {
    pub name: String,
    pub note: String,
}

impl Arbitrary for AuthorParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (author_name(), note())
            .prop_map(|(name, note)| AuthorParams { name, note })
            .boxed()
    }
}

/// Parameters for creating a book. `author` is an index into whatever
/// authors exist when the book is created.
#[derive(Debug, Clone)]
pub struct BookParams {
    pub title: String,
    pub author: prop::sample::Index,
    pub note: String,
}

impl Arbitrary for BookParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (book_title(), any::<prop::sample::Index>(), note())
            .prop_map(|(title, author, note)| BookParams {
                title,
                author,
                note,
            })
            .boxed()
    }
}

/// One step in a random edit session over a user's authors.
#[derive(Debug, Clone)]
pub enum AuthorOp {
    Create(AuthorParams),
    /// Rename whichever author the index lands on.
    Update(prop::sample::Index, AuthorParams),
    /// Delete whichever author the index lands on.
    Delete(prop::sample::Index),
}

impl Arbitrary for AuthorOp {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            3 => any::<AuthorParams>().prop_map(AuthorOp::Create),
            1 => (any::<prop::sample::Index>(), any::<AuthorParams>())
                .prop_map(|(i, p)| AuthorOp::Update(i, p)),
            1 => any::<prop::sample::Index>().prop_map(AuthorOp::Delete),
        ]
        .boxed()
    }
}

/// Generate an edit session of up to `max_len` steps.
pub fn author_ops(max_len: usize) -> impl Strategy<Value = Vec<AuthorOp>> {
    prop::collection::vec(any::<AuthorOp>(), 0..=max_len)
}

/// Build an author from parameters.
pub fn author_from_params(id: AuthorId, params: &AuthorParams) -> Author {
    Author::new(id, params.name.clone(), params.note.clone())
}

/// Build a book from parameters against a list of existing authors.
///
/// Returns `None` when there are no authors to reference.
pub fn book_from_params(id: BookId, params: &BookParams, authors: &[Author]) -> Option<Book> {
    if authors.is_empty() {
        return None;
    }
    let author = params.author.get(authors);
    Some(Book::new(
        id,
        params.title.clone(),
        author.id,
        params.note.clone(),
    ))
}

/// Generate a collection of authors with distinct ids, in id order.
pub fn authors(max_len: usize) -> impl Strategy<Value = Vec<Author>> {
    prop::collection::btree_set(small_id(), 0..=max_len).prop_flat_map(|ids| {
        let len = ids.len();
        prop::collection::vec(any::<AuthorParams>(), len).prop_map(move |params| {
            ids.iter()
                .zip(params.iter())
                .map(|(&id, p)| author_from_params(AuthorId(id), p))
                .collect()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::next_id;

    proptest! {
        #[test]
        fn test_email_has_one_at(email in email()) {
            prop_assert_eq!(email.matches('@').count(), 1);
        }

        #[test]
        fn test_generated_author_ids_distinct(authors in authors(10)) {
            let mut ids: Vec<_> = authors.iter().map(|a| a.id).collect();
            ids.dedup();
            prop_assert_eq!(ids.len(), authors.len());
        }

        #[test]
        fn test_next_id_exceeds_generated_ids(authors in authors(10)) {
            let next = next_id(authors.iter().map(|a| a.id.get())).unwrap();
            prop_assert!(authors.iter().all(|a| a.id.get() < next));
        }

        #[test]
        fn test_book_references_existing_author(
            authors in authors(5),
            params: BookParams,
        ) {
            match book_from_params(BookId(1), &params, &authors) {
                Some(book) => prop_assert!(authors.iter().any(|a| a.id == book.author_id)),
                None => prop_assert!(authors.is_empty()),
            }
        }
    }
}
