//! Strong type definitions for catalog identifiers.
//!
//! Identifiers are newtypes so an author id can never be passed where a
//! book id is expected. Both serialize as bare JSON integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an author, unique within one user's author collection.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub u64);

impl AuthorId {
    /// Create an author id from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Allocate the id that follows every id in `existing`.
    ///
    /// `None` once the collection already holds `u64::MAX`.
    pub fn next_after<I>(existing: I) -> Option<Self>
    where
        I: IntoIterator<Item = AuthorId>,
    {
        next_id(existing.into_iter().map(AuthorId::get)).map(Self)
    }
}

impl fmt::Debug for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthorId({})", self.0)
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AuthorId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Identifier of a book, unique within one user's book collection.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u64);

impl BookId {
    /// Create a book id from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Allocate the id that follows every id in `existing`.
    ///
    /// `None` once the collection already holds `u64::MAX`.
    pub fn next_after<I>(existing: I) -> Option<Self>
    where
        I: IntoIterator<Item = BookId>,
    {
        next_id(existing.into_iter().map(BookId::get)).map(Self)
    }
}

impl fmt::Debug for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookId({})", self.0)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BookId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// `max(existing) + 1`, or `1` for an empty collection.
///
/// Ids freed by deleting anything but the current maximum are never handed
/// out again; deleting the maximum makes its id available to the next insert.
/// Returns `None` when the maximum is `u64::MAX` and no larger id exists.
pub fn next_id<I>(existing: I) -> Option<u64>
where
    I: IntoIterator<Item = u64>,
{
    match existing.into_iter().max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_next_id_empty() {
        assert_eq!(next_id(std::iter::empty()), Some(1));
        assert_eq!(AuthorId::next_after(Vec::new()), Some(AuthorId(1)));
    }

    #[test]
    fn test_next_id_follows_max() {
        assert_eq!(AuthorId::next_after([AuthorId(1), AuthorId(2)]), Some(AuthorId(3)));
        assert_eq!(BookId::next_after([BookId(7), BookId(2)]), Some(BookId(8)));
    }

    #[test]
    fn test_next_id_exhausted_at_max() {
        assert_eq!(next_id([3, u64::MAX]), None);
        assert_eq!(AuthorId::next_after([AuthorId(u64::MAX)]), None);
        assert_eq!(BookId::next_after([BookId(u64::MAX - 1)]), Some(BookId(u64::MAX)));
    }

    #[test]
    fn test_ids_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&AuthorId(4)).unwrap(), "4");
        let id: BookId = serde_json::from_str("12").unwrap();
        assert_eq!(id, BookId(12));
    }

    proptest! {
        #[test]
        fn next_id_exceeds_every_existing(ids in prop::collection::vec(0u64..1_000_000, 0..32)) {
            let next = next_id(ids.iter().copied()).unwrap();
            prop_assert!(ids.iter().all(|&id| id < next));
            prop_assert!(next >= 1);
        }
    }
}
