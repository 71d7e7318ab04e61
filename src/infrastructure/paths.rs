//! Path utilities for the Zellij sandbox environment.
//!
//! This module centralizes where the plugin keeps its files in the Zellij
//! plugin sandbox, where the host filesystem is mounted under `/host`, and
//! provides the tilde/prefix conversions needed when paths cross the sandbox
//! boundary in either direction.

use std::path::PathBuf;

/// Returns the data directory for Linkdeck files.
///
/// The directory is located at `/host/.local/share/zellij/linkdeck` in the
/// Zellij sandbox. `/host` points to the cwd of the last focused terminal, or
/// the folder where Zellij was started if that's not available, which
/// typically resolves to the user's home directory.
///
/// # Examples
///
/// ```
/// use linkdeck::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str().unwrap(), "/host/.local/share/zellij/linkdeck");
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("linkdeck")
}

/// Returns the path of the session cache file.
#[must_use]
pub fn session_cache_file() -> PathBuf {
    get_data_dir().join("session.json")
}

/// Returns the directory downloaded QR images are saved into.
#[must_use]
pub fn qr_image_dir() -> PathBuf {
    get_data_dir().join("qr")
}

/// Expands tilde paths to use the `/host` prefix for the Zellij sandbox.
///
/// User-supplied paths (like a custom theme file) are written from the host's
/// point of view, where `~` is home; inside the sandbox that maps to `/host`.
///
/// # Examples
///
/// ```
/// use linkdeck::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/mine.toml"), "/host/themes/mine.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

/// Rewrites the `/host` prefix of sandbox paths back to `~` for display.
///
/// The inverse of [`expand_tilde`]: when telling the user where a QR image
/// landed, the sandbox mount point is noise and the path should read as it
/// does on the host filesystem.
///
/// # Examples
///
/// ```
/// use linkdeck::infrastructure::strip_host_prefix;
///
/// assert_eq!(
///     strip_host_prefix("/host/.local/share/zellij/linkdeck/qr/docs.png"),
///     "~/.local/share/zellij/linkdeck/qr/docs.png"
/// );
/// assert_eq!(strip_host_prefix("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    if path == "/host" {
        return "~".to_string();
    }
    match path.strip_prefix("/host/") {
        Some(rest) => format!("~/{rest}"),
        None => path.to_string(),
    }
}
