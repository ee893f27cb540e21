//! Navigation targets returned by auth transitions.
//!
//! Views live outside this workspace. The stores only tell the caller where
//! to go next, and the auth store gates routes that need a session.

use std::fmt;

use crate::types::{AuthorId, BookId};

/// A navigable location in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page with the login and registration forms.
    Home,
    Books,
    BookDetail(BookId),
    Authors,
    AuthorDetail(AuthorId),
    Profile,
}

impl Route {
    /// Whether visiting this route requires an authenticated session.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Home)
    }

    /// Resolve a URL path. Anything unrecognised lands on [`Route::Home`].
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["books"] => Route::Books,
            ["books", id] => id
                .parse()
                .map(|id| Route::BookDetail(BookId(id)))
                .unwrap_or(Route::Home),
            ["authors"] => Route::Authors,
            ["authors", id] => id
                .parse()
                .map(|id| Route::AuthorDetail(AuthorId(id)))
                .unwrap_or(Route::Home),
            ["profile"] => Route::Profile,
            _ => Route::Home,
        }
    }

    /// The URL path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Books => "/books".to_string(),
            Route::BookDetail(id) => format!("/books/{id}"),
            Route::Authors => "/authors".to_string(),
            Route::AuthorDetail(id) => format!("/authors/{id}"),
            Route::Profile => "/profile".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path("/books"), Route::Books);
        assert_eq!(Route::from_path("/books/7"), Route::BookDetail(BookId(7)));
        assert_eq!(Route::from_path("/authors/2/"), Route::AuthorDetail(AuthorId(2)));
        assert_eq!(Route::from_path("/profile"), Route::Profile);
    }

    #[test]
    fn test_unknown_paths_land_home() {
        assert_eq!(Route::from_path("/nowhere"), Route::Home);
        assert_eq!(Route::from_path("/books/abc"), Route::Home);
        assert_eq!(Route::from_path("/books/1/edit"), Route::Home);
    }

    #[test]
    fn test_only_home_is_public() {
        assert!(!Route::Home.requires_auth());
        assert!(Route::Books.requires_auth());
        assert!(Route::AuthorDetail(AuthorId(1)).requires_auth());
        assert!(Route::Profile.requires_auth());
    }

    #[test]
    fn test_path_matches_parse() {
        for route in [Route::Books, Route::BookDetail(BookId(3)), Route::Profile] {
            assert_eq!(Route::from_path(&route.path()), route);
        }
    }
}
