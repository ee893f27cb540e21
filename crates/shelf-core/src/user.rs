//! Users, sessions, and the profile view.
//!
//! Passwords are stored and compared in plain text. This is a known
//! limitation of the catalog, not an oversight to be patched here.

use serde::{Deserialize, Serialize};

/// A registered user. The email is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub password: String,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Exact, case-sensitive match on both fields.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

/// The currently authenticated user.
///
/// Persisted as the session marker `{"email": .., "isAuthenticated": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    #[serde(rename = "isAuthenticated")]
    pub authenticated: bool,
}

impl Session {
    /// An authenticated session for `email`.
    pub fn authenticated(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            authenticated: true,
        }
    }

    /// The profile exposed to callers.
    pub fn profile(&self) -> Profile {
        Profile {
            email: self.email.clone(),
        }
    }
}

/// What a caller may learn about the session's user. Never the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_matches_exactly() {
        let user = User::new("ann@x.com", "pw");
        assert!(user.matches("ann@x.com", "pw"));
        assert!(!user.matches("Ann@x.com", "pw"));
        assert!(!user.matches("ann@x.com", "PW"));
    }

    #[test]
    fn test_session_marker_shape() {
        let session = Session::authenticated("ann@x.com");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json, serde_json::json!({"email": "ann@x.com", "isAuthenticated": true}));
    }
}
