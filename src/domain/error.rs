//! Error types for the Linkdeck plugin.
//!
//! This module defines the centralized error type [`LinkdeckError`] and a type alias
//! [`Result`] for convenient error handling throughout the plugin, plus [`ApiError`],
//! the value-level failure produced when a backend call is rejected. Plugin errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for Linkdeck plugin operations.
///
/// This enum consolidates all error conditions that can occur during plugin execution,
/// from session-cache operations to I/O failures and configuration issues. Most variants
/// wrap underlying errors from external crates using `#[from]` for automatic conversion.
///
/// # Examples
///
/// ```
/// use linkdeck::domain::LinkdeckError;
///
/// fn validate_config() -> Result<(), LinkdeckError> {
///     Err(LinkdeckError::Config("Missing required field".to_string()))
/// }
///
/// fn read_cache() -> Result<(), LinkdeckError> {
///     Err(LinkdeckError::Storage("Failed to read file".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum LinkdeckError {
    /// Session cache or QR file operation failed.
    ///
    /// Occurs when reading from or writing to the on-disk cache fails.
    /// The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    ///
    /// Occurs when the plugin cannot parse or apply the configured theme.
    /// The string contains a description of what went wrong.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with background worker failed.
    ///
    /// Occurs when the plugin cannot communicate with its background worker thread,
    /// typically during session-cache or QR-file operations. The string contains
    /// details about the communication failure.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for Linkdeck operations.
///
/// This is a type alias for `std::result::Result<T, LinkdeckError>` that simplifies
/// function signatures throughout the codebase.
///
/// # Examples
///
/// ```
/// use linkdeck::domain::Result;
///
/// fn load_session() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, LinkdeckError>;

/// A failed backend operation, as observed by the dashboard.
///
/// Carries the HTTP status the host reported and whatever message could be
/// extracted from the response body. A status of `0` means the request never
/// reached the backend (DNS, TLS, or connection failure inside the host);
/// anything else is the backend's own rejection.
///
/// This is the failure value stored in the request lifecycle wrappers, not a
/// crate error: a rejected login or a duplicate alias is ordinary application
/// state, rendered in a banner or inside the open dialog, never propagated
/// as `Err` through the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code, or `0` when the request failed in transit.
    pub status: u16,
    /// Human-readable description extracted from the response.
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// True when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        self.status == 0
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_transport() {
            write!(f, "network error: {}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.status)
        }
    }
}
