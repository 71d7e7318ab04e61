//! Storage record models for the on-disk cache.
//!
//! This module defines the raw record types persisted by the cache layer.
//! These types are separate from domain models to maintain a clear boundary
//! between what the backend hands out and what survives a plugin restart on
//! disk.

use serde::{Deserialize, Serialize};

use crate::domain::{Session, User};

/// The cached session, as written to disk.
///
/// Flattened relative to the domain [`Session`] so the cache file stays a
/// simple one-level object, and extended with `stored_at` for debugging stale
/// caches by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Bearer token for authenticated backend calls.
    pub access_token: String,

    /// Backend id of the signed-in user.
    pub user_id: String,

    /// Email of the signed-in user, shown in the dashboard header.
    pub email: String,

    /// Unix timestamp after which the token is dead, `None` for non-expiring.
    pub expires_at: Option<i64>,

    /// Unix timestamp when this record was written.
    pub stored_at: i64,
}

impl StoredSession {
    /// Captures a domain session for persistence at time `stored_at`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkdeck::domain::{Session, User};
    /// use linkdeck::storage::StoredSession;
    ///
    /// let session = Session {
    ///     access_token: "tok".to_string(),
    ///     user: User { id: "u1".to_string(), email: "user@example.com".to_string() },
    ///     expires_at: None,
    /// };
    /// let record = StoredSession::from_session(&session, 1700000000);
    /// assert_eq!(record.email, "user@example.com");
    /// assert_eq!(record.stored_at, 1700000000);
    /// ```
    #[must_use]
    pub fn from_session(session: &Session, stored_at: i64) -> Self {
        Self {
            access_token: session.access_token.clone(),
            user_id: session.user.id.clone(),
            email: session.user.email.clone(),
            expires_at: session.expires_at,
            stored_at,
        }
    }

    /// Rebuilds the domain session this record was captured from.
    #[must_use]
    pub fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            user: User {
                id: self.user_id,
                email: self.email,
            },
            expires_at: self.expires_at,
        }
    }

    /// True when the cached token is already dead at `now` (Unix seconds).
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

    #[test]
    fn capture_and_rebuild_round_trip() {
        let session = Session {
            access_token: "tok".to_string(),
            user: User {
                id: "u1".to_string(),
                email: "user@example.com".to_string(),
            },
            expires_at: Some(42),
        };
        let record = StoredSession::from_session(&session, 10);
        assert_eq!(record.into_session(), session);
    }

    #[test]
    fn expiry_follows_the_token() {
        let record = StoredSession {
            access_token: "tok".to_string(),
            user_id: "u1".to_string(),
            email: "user@example.com".to_string(),
            expires_at: Some(100),
            stored_at: 0,
        };
        assert!(record.is_expired(100));
        assert!(!record.is_expired(99));
    }
}
