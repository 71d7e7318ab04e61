//! Authenticated session model.
//!
//! The session is explicit state, owned by the application and handed by
//! reference to whatever needs it (request building, the on-disk cache). It is
//! populated exactly twice in a plugin's life: from the worker's cache restore
//! at startup, or from a successful login. Logout drops it. Nothing else in
//! the plugin reaches for ambient auth state.

use serde::{Deserialize, Serialize};

/// The signed-in user, as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// An authenticated backend session.
///
/// `access_token` is sent as a bearer token on every authenticated request.
/// `expires_at` is a Unix timestamp when the backend issues expiring tokens;
/// `None` means the token does not expire client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    /// True when the token's expiry has passed at `now` (Unix seconds).
    ///
    /// Sessions without an expiry never report expired.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "tok".to_string(),
            user: User {
                id: "u1".to_string(),
                email: "user@example.com".to_string(),
            },
            expires_at,
        }
    }

    #[test]
    fn expiry_compares_against_now() {
        assert!(session(Some(100)).is_expired(100));
        assert!(session(Some(100)).is_expired(101));
        assert!(!session(Some(100)).is_expired(99));
    }

    #[test]
    fn missing_expiry_never_expires() {
        assert!(!session(None).is_expired(i64::MAX));
    }
}
