//! JSON file-based cache backend.
//!
//! This module provides a simple, human-readable cache implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! A cache differs from real storage in one way that shapes this module: the
//! backend is always the source of truth, so an unreadable cache file is
//! discarded and started fresh instead of failing the plugin.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::{LinkdeckError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::StoredSession;

/// JSON cache container format.
///
/// Top-level structure serialized to disk. The `extra` map absorbs fields
/// written by newer plugin versions so a downgrade does not wipe them.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheData {
    /// Version of the cache format for future migrations.
    version: u32,

    /// The cached session, absent when signed out.
    #[serde(default)]
    session: Option<StoredSession>,

    /// Unknown fields from newer versions, carried through writes.
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: 1,
            session: None,
            extra: HashMap::new(),
        }
    }
}

/// JSON file cache backend.
///
/// Keeps the whole cache in memory and persists it on modification. QR images
/// are not part of the JSON file; they are written as individual PNG files
/// under the configured image directory.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It's designed to be used from a single
/// worker thread, matching the Zellij plugin architecture.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "session": {
///     "access_token": "...",
///     "user_id": "u1",
///     "email": "user@example.com",
///     "expires_at": 1893456000,
///     "stored_at": 1756100000
///   }
/// }
/// ```
pub struct JsonCache {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// Directory QR images are saved into.
    qr_dir: PathBuf,

    /// In-memory data, loaded on creation.
    data: CacheData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonCache {
    /// Creates or opens a JSON cache.
    ///
    /// If the file exists and parses, existing data is loaded; an unreadable
    /// or corrupt file is replaced with an empty cache. Parent directories
    /// are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use linkdeck::storage::JsonCache;
    /// use std::path::PathBuf;
    ///
    /// let cache = JsonCache::new(
    ///     PathBuf::from("/tmp/linkdeck/cache.json"),
    ///     PathBuf::from("/tmp/linkdeck/qr"),
    /// )?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf, qr_dir: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON cache");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)
        } else {
            tracing::debug!("initializing new empty cache");
            CacheData::default()
        };

        tracing::debug!(
            has_session = data.session.is_some(),
            "cache initialized"
        );

        Ok(Self {
            file_path,
            qr_dir,
            data,
            dirty: false,
        })
    }

    /// Loads cache data, falling back to empty on any read or parse failure.
    ///
    /// The backend can always re-issue everything in here, so a broken cache
    /// costs one login, not the plugin.
    fn load_from_file(path: &Path) -> CacheData {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read cache file, starting empty");
                return CacheData::default();
            }
        };

        match serde_json::from_str::<CacheData>(&contents) {
            Ok(data) => {
                tracing::debug!(version = data.version, "loaded cache data");
                data
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to parse cache file, starting empty");
                CacheData::default()
            }
        }
    }

    /// Saves cache data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then atomically renames it to the
    /// target path, so the file is never left half-written even if the
    /// process dies mid-save.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - JSON serialization fails (should never happen with valid data)
    /// - Temporary file cannot be written
    /// - Rename operation fails (rare on POSIX systems)
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        tracing::debug!(path = ?self.file_path, "saving cache data");

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| LinkdeckError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!("cache saved successfully");
        Ok(())
    }
}

impl Storage for JsonCache {
    fn load_session(&mut self, now: i64) -> Result<Option<StoredSession>> {
        let _span = tracing::debug_span!("cache_load_session", now = now).entered();

        match &self.data.session {
            Some(session) if session.is_expired(now) => {
                tracing::debug!(
                    expires_at = ?session.expires_at,
                    "cached session expired, dropping it"
                );
                self.data.session = None;
                self.dirty = true;
                self.save_to_file()?;
                Ok(None)
            }
            Some(session) => {
                tracing::debug!(user_id = %session.user_id, "cached session found");
                Ok(Some(session.clone()))
            }
            None => {
                tracing::debug!("no cached session");
                Ok(None)
            }
        }
    }

    fn store_session(&mut self, session: &StoredSession) -> Result<()> {
        let _span =
            tracing::debug_span!("cache_store_session", user_id = %session.user_id).entered();

        self.data.session = Some(session.clone());
        self.dirty = true;
        self.save_to_file()?;

        tracing::debug!("session stored");
        Ok(())
    }

    fn clear_session(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("cache_clear_session").entered();

        if self.data.session.take().is_some() {
            self.dirty = true;
            self.save_to_file()?;
            tracing::debug!("session cleared");
        } else {
            tracing::debug!("no session to clear");
        }
        Ok(())
    }

    fn save_qr_image(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let _span = tracing::debug_span!("cache_save_qr_image",
            file_name = %file_name,
            size = bytes.len()
        )
        .entered();

        // Bare names only; anything path-like could escape the image dir.
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            return Err(LinkdeckError::Storage(format!(
                "refusing suspicious image file name: {file_name}"
            )));
        }

        std::fs::create_dir_all(&self.qr_dir)?;
        let path = self.qr_dir.join(file_name);
        std::fs::write(&path, bytes)?;

        tracing::debug!(path = ?path, "QR image saved");
        Ok(path)
    }
}

impl Drop for JsonCache {
    /// Ensures data is saved on drop, even if nothing flushed explicitly.
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_at: Option<i64>) -> StoredSession {
        StoredSession {
            access_token: "tok".to_string(),
            user_id: "u1".to_string(),
            email: "user@example.com".to_string(),
            expires_at,
            stored_at: 1000,
        }
    }

    fn cache_in(dir: &tempfile::TempDir) -> JsonCache {
        JsonCache::new(dir.path().join("cache.json"), dir.path().join("qr")).unwrap()
    }

    #[test]
    fn store_then_load_round_trips_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let mut cache = cache_in(&dir);
        cache.store_session(&record(None)).unwrap();
        drop(cache);

        let mut reopened = cache_in(&dir);
        let loaded = reopened.load_session(2000).unwrap();
        assert_eq!(loaded, Some(record(None)));
    }

    #[test]
    fn expired_session_loads_as_absent_and_is_dropped() {
        let dir = tempfile::tempdir().unwrap();

        let mut cache = cache_in(&dir);
        cache.store_session(&record(Some(1500))).unwrap();

        assert_eq!(cache.load_session(1500).unwrap(), None);

        // Gone from disk too, not just this instance.
        let mut reopened = cache_in(&dir);
        assert_eq!(reopened.load_session(0).unwrap(), None);
    }

    #[test]
    fn unexpired_session_survives_load() {
        let dir = tempfile::tempdir().unwrap();

        let mut cache = cache_in(&dir);
        cache.store_session(&record(Some(1500))).unwrap();
        assert!(cache.load_session(1499).unwrap().is_some());
    }

    #[test]
    fn clear_removes_the_session() {
        let dir = tempfile::tempdir().unwrap();

        let mut cache = cache_in(&dir);
        cache.store_session(&record(None)).unwrap();
        cache.clear_session().unwrap();
        assert_eq!(cache.load_session(0).unwrap(), None);

        // Clearing an empty cache is fine.
        cache.clear_session().unwrap();
    }

    #[test]
    fn corrupt_cache_file_starts_empty_instead_of_failing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cache.json"), b"{ not json").unwrap();

        let mut cache = cache_in(&dir);
        assert_eq!(cache.load_session(0).unwrap(), None);
    }

    #[test]
    fn save_leaves_no_temporary_file_behind() {
        let dir = tempfile::tempdir().unwrap();

        let mut cache = cache_in(&dir);
        cache.store_session(&record(None)).unwrap();

        assert!(dir.path().join("cache.json").exists());
        assert!(!dir.path().join("cache.tmp").exists());
    }

    #[test]
    fn qr_images_land_in_the_image_directory() {
        let dir = tempfile::tempdir().unwrap();

        let mut cache = cache_in(&dir);
        let path = cache.save_qr_image("docs.png", &[1, 2, 3]).unwrap();

        assert_eq!(path, dir.path().join("qr").join("docs.png"));
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn path_like_image_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);

        assert!(cache.save_qr_image("../escape.png", &[1]).is_err());
        assert!(cache.save_qr_image("a/b.png", &[1]).is_err());
        assert!(cache.save_qr_image("", &[1]).is_err());
    }

    #[test]
    fn unknown_fields_survive_a_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("cache.json"),
            br#"{"version": 1, "session": null, "pinned_links": ["l1"]}"#,
        )
        .unwrap();

        let mut cache = cache_in(&dir);
        cache.store_session(&record(None)).unwrap();
        drop(cache);

        let raw = std::fs::read_to_string(dir.path().join("cache.json")).unwrap();
        assert!(raw.contains("pinned_links"));
    }
}
