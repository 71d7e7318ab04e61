//! Link domain model and operations.
//!
//! This module defines the core `Link` type representing a shortened URL owned by
//! the signed-in user, plus `ClickRecord`, one recorded visit to a short link.
//! Both mirror the backend's wire shape and provide user-friendly formatting for
//! the dashboard table.

use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// A shortened link owned by the signed-in user.
///
/// Links are created and persisted by the backend; the plugin only ever
/// receives them. The backend assigns `short_url` (a random slug) on creation
/// and, when the user asked for one, stores the alias in `custom_url`. The
/// visitor-facing address is `https://{short domain}/{custom_url or short_url}`.
///
/// # Fields
///
/// - `id`: Backend identifier, used for deletes and click lookups
/// - `title`: User-chosen display title
/// - `original_url`: The long URL the short link redirects to
/// - `short_url`: Backend-assigned slug
/// - `custom_url`: Optional user-chosen alias, preferred over `short_url` when set
/// - `qr`: Optional absolute URL of the backend-generated QR code image
/// - `user_id`: Owning user
/// - `created_at`: RFC 3339 creation timestamp as the backend sent it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub original_url: String,
    pub short_url: String,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub qr: Option<String>,
    pub user_id: String,
    pub created_at: String,
}

impl Link {
    /// Returns the slug visitors use, preferring the custom alias when present.
    #[must_use]
    pub fn slug(&self) -> &str {
        match &self.custom_url {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.short_url,
        }
    }

    /// Returns the full visitor-facing address for this link.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkdeck::domain::Link;
    ///
    /// let link = Link {
    ///     id: "abc123".to_string(),
    ///     title: "My blog".to_string(),
    ///     original_url: "https://example.com/posts/1".to_string(),
    ///     short_url: "x9k2p".to_string(),
    ///     custom_url: Some("blog".to_string()),
    ///     qr: None,
    ///     user_id: "u1".to_string(),
    ///     created_at: "2024-01-15T10:30:00Z".to_string(),
    /// };
    /// assert_eq!(link.short_address("tinyurlx.in"), "https://tinyurlx.in/blog");
    /// ```
    #[must_use]
    pub fn short_address(&self, short_domain: &str) -> String {
        format!("https://{}/{}", short_domain, self.slug())
    }

    /// Returns the creation time as a Unix timestamp, or 0 when the
    /// backend timestamp is not parseable.
    ///
    /// Malformed rows sort to the oldest end of the table instead of
    /// failing the whole fetch.
    #[must_use]
    pub fn created_timestamp(&self) -> i64 {
        chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map(|created| created.timestamp())
            .unwrap_or(0)
    }

    /// Returns a human-readable string describing how long ago the link was created.
    ///
    /// The format varies based on the time elapsed:
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago" (e.g., "5m ago")
    /// - Less than 1 day: "Xh ago" (e.g., "3h ago")
    /// - 1 day or more: "Xd ago" (e.g., "7d ago")
    ///
    /// Returns an empty string when `created_at` is not parseable, so a
    /// malformed backend row degrades to a blank age column instead of a
    /// crashed render.
    #[must_use]
    pub fn created_ago(&self) -> String {
        let Ok(created) = chrono::DateTime::parse_from_rfc3339(&self.created_at) else {
            return String::new();
        };

        let diff = chrono::Utc::now().timestamp() - created.timestamp();

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        }
    }

    /// File name used when the QR image for this link is saved to disk.
    #[must_use]
    pub fn qr_file_name(&self) -> String {
        format!("{}.png", self.slug())
    }
}

/// One recorded visit to a short link.
///
/// The backend records a row per redirect with coarse visitor info extracted
/// from the user agent. The dashboard only aggregates counts, but the fields
/// are kept so richer views can be added without a wire change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRecord {
    pub id: String,
    pub url_id: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(custom_url: Option<&str>) -> Link {
        Link {
            id: "l1".to_string(),
            title: "Docs".to_string(),
            original_url: "https://example.com/docs".to_string(),
            short_url: "a1b2c".to_string(),
            custom_url: custom_url.map(str::to_string),
            qr: None,
            user_id: "u1".to_string(),
            created_at: "2024-01-15T10:30:00Z".to_string(),
        }
    }

    #[test]
    fn slug_prefers_custom_alias() {
        assert_eq!(link(Some("docs")).slug(), "docs");
        assert_eq!(link(None).slug(), "a1b2c");
        assert_eq!(link(Some("")).slug(), "a1b2c");
    }

    #[test]
    fn short_address_joins_domain_and_slug() {
        assert_eq!(
            link(Some("docs")).short_address("tinyurlx.in"),
            "https://tinyurlx.in/docs"
        );
    }

    #[test]
    fn created_ago_buckets_by_elapsed_time() {
        let mut l = link(None);

        l.created_at = chrono::Utc::now().to_rfc3339();
        assert_eq!(l.created_ago(), "just now");

        l.created_at = (chrono::Utc::now() - chrono::Duration::seconds(300)).to_rfc3339();
        assert_eq!(l.created_ago(), "5m ago");

        l.created_at = (chrono::Utc::now() - chrono::Duration::hours(3)).to_rfc3339();
        assert_eq!(l.created_ago(), "3h ago");

        l.created_at = (chrono::Utc::now() - chrono::Duration::days(7)).to_rfc3339();
        assert_eq!(l.created_ago(), "7d ago");
    }

    #[test]
    fn created_ago_tolerates_malformed_timestamps() {
        let mut l = link(None);
        l.created_at = "not a date".to_string();
        assert_eq!(l.created_ago(), "");
        assert_eq!(l.created_timestamp(), 0);
    }

    #[test]
    fn created_timestamp_parses_offset_forms() {
        let mut l = link(None);
        l.created_at = "2024-01-15T10:30:00+02:00".to_string();
        let with_offset = l.created_timestamp();

        l.created_at = "2024-01-15T08:30:00Z".to_string();
        assert_eq!(l.created_timestamp(), with_offset);
    }

    #[test]
    fn deserializes_backend_row_with_missing_optionals() {
        let raw = r#"{
            "id": "9",
            "title": "Repo",
            "original_url": "https://github.com/example/repo",
            "short_url": "gh9",
            "user_id": "u1",
            "created_at": "2024-03-01T00:00:00Z"
        }"#;
        let l: Link = serde_json::from_str(raw).unwrap();
        assert_eq!(l.custom_url, None);
        assert_eq!(l.qr, None);
        assert_eq!(l.slug(), "gh9");
    }
}
