//! Cache backend abstraction.
//!
//! This module defines the [`Storage`] trait that abstracts over the plugin's
//! on-disk cache. This keeps the worker's message handling testable against
//! lightweight fakes and leaves room for a different persistence format
//! without touching business logic.
//!
//! # Design Philosophy
//!
//! The trait is deliberately narrow: exactly the operations the worker
//! performs, not a generic key-value store. The plugin caches a single
//! session (so the user is not asked to sign in on every plugin load) and
//! writes downloaded QR images next to it.

use std::path::PathBuf;

use crate::domain::error::Result;
use crate::storage::models::StoredSession;

/// Abstraction over the plugin's persistent cache.
///
/// Implementations must tolerate concurrent plugin instances only in the weak
/// sense of never corrupting the file (atomic replace); last writer wins.
///
/// # Implementations
///
/// - [`JsonCache`](crate::storage::JsonCache): JSON file with atomic writes (default)
pub trait Storage: Send {
    /// Loads the cached session, treating expired ones as absent.
    ///
    /// `now` is the current Unix timestamp; an expired record is dropped from
    /// the cache as a side effect so it is not offered again.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file cannot be read or rewritten.
    fn load_session(&mut self, now: i64) -> Result<Option<StoredSession>>;

    /// Stores the session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file cannot be written.
    fn store_session(&mut self, session: &StoredSession) -> Result<()>;

    /// Removes the cached session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file cannot be rewritten.
    fn clear_session(&mut self) -> Result<()>;

    /// Writes a downloaded QR image and returns the path it landed at.
    ///
    /// `file_name` is a bare name, not a path; the implementation chooses the
    /// directory and creates it as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    fn save_qr_image(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}
