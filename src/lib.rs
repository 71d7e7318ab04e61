//! Linkdeck: A Zellij plugin dashboard for the tinyurlx URL shortener.
//!
//! Linkdeck is a terminal multiplexer plugin that provides:
//! - Email/password sign-in with a locally cached session
//! - Short link creation with optional custom aliases
//! - A live link table with click counts, ages, and destinations
//! - Case-insensitive title filtering with match highlighting
//! - Link deletion and QR image download to the local filesystem

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← Business logic
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ API Layer     │   │ Worker Layer  │
//! │ (ui/)         │   │ (api/)        │   │ (worker/)     │
//! │ - Rendering   │   │ - Requests    │   │ - Session I/O │
//! │ - Theming     │   │ - Decoding    │   │ - QR files    │
//! │ - Components  │   │ - Auth header │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure, Storage & Domain Layers            │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Session cache, QR files (storage/)               │
//! │  - Links, sessions, request lifecycle (domain/)     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`api`]: Backend request preparation and response decoding
//! - [`domain`]: Core domain types (links, sessions, request lifecycle, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`storage`]: Session cache and QR image persistence
//! - [`worker`]: Background worker for filesystem I/O
//! - [`ui`]: Terminal rendering with theme support
//! - `observability`: OpenTelemetry tracing (internal)
//!
//! # Configuration
//!
//! The plugin is configured via Zellij's plugin configuration:
//!
//! ```kdl
//! // ~/.config/zellij/layouts/default.kdl
//! pane {
//!     plugin location="file:/path/to/linkdeck.wasm" {
//!         api_base_url "https://api.tinyurlx.in"
//!         short_domain "tinyurlx.in"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! Or loaded on-demand with `Ctrl+o` → `Ctrl+w` and entering the configuration.
//!
//! # Initialization Flow
//!
//! 1. **Plugin Load** (`main.rs`):
//!    - Parse configuration from Zellij
//!    - Initialize tracing (optional)
//!    - Create `AppState` with theme
//!    - Subscribe to Zellij events and request web access
//!
//! 2. **Session Restore**:
//!    - Once permissions are granted, ask the worker for the cached session
//!    - A valid cached session skips the login screen entirely
//!
//! 3. **Dashboard**:
//!    - Fetch the account's links, then the click records for those links
//!    - Every response is settled against the generation it was issued under,
//!      so late responses from superseded requests are discarded
//!
//! 4. **UI Rendering**:
//!    - Compute view model from state
//!    - Render components (header, stats, filter, table, footer)
//!    - Handle user input (j/k//, n, d, g, r, L, q)
//!
//! # Examples
//!
//! ## Basic Usage (Library)
//!
//! ```rust
//! use linkdeck::{handle_event, initialize, Config, Event};
//!
//! let config = Config {
//!     short_domain: "tinyurlx.in".to_string(),
//!     ..Default::default()
//! };
//!
//! let mut state = initialize(&config);
//!
//! // Tab moves focus between the credential fields.
//! let (redraw, actions) = handle_event(&mut state, &Event::Tab)?;
//! assert!(redraw);
//! assert!(actions.is_empty());
//! # Ok::<(), linkdeck::LinkdeckError>(())
//! ```
//!
//! ## Worker Usage
//!
//! ```rust,no_run
//! use linkdeck::worker::{LinkdeckWorker, WorkerMessage};
//! use zellij_tile::prelude::*;
//!
//! // In worker thread
//! let mut worker = LinkdeckWorker::default();
//! let message = WorkerMessage::load_session();
//! worker.on_message(
//!     "linkdeck".to_string(),
//!     serde_json::to_string(&message).unwrap(),
//! );
//! ```
//!
//! # Key Design Decisions
//!
//! ## Request Generations
//!
//! Every backend call is stamped with a generation number by its request
//! wrapper. Responses carry the generation back, and a response only lands
//! when its generation matches the latest issued request. Refreshing twice in
//! quick succession therefore shows the second response, never the first,
//! regardless of arrival order.
//!
//! ## Worker-Based File I/O
//!
//! Session caching and QR image writes run in a separate Zellij worker
//! thread:
//! - Keeps the render path free of filesystem latency
//! - Uses IPC messaging for result communication
//!
//! ## Immutable View Models
//!
//! UI rendering uses computed view models:
//! - Clear separation between state and display
//! - Enables easier testing and validation
//! - Pre-computes expensive operations (match highlighting, truncation)
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Terminal**: Any ANSI-capable terminal emulator

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, Screen};
pub use domain::{Link, LinkdeckError, Result, Session};
pub use ui::Theme;

use std::collections::BTreeMap;

/// Default backend the dashboard talks to.
pub const DEFAULT_API_BASE_URL: &str = "https://api.tinyurlx.in";

/// Default domain short addresses are presented under.
pub const DEFAULT_SHORT_DOMAIN: &str = "tinyurlx.in";

/// Plugin configuration parsed from Zellij's configuration system.
///
/// Configuration values are provided via Zellij's KDL layout configuration
/// and passed to the plugin during initialization.
///
/// # Example
///
/// ```kdl
/// plugin location="file:/path/to/linkdeck.wasm" {
///     api_base_url "https://api.tinyurlx.in"
///     short_domain "tinyurlx.in"
///     theme "catppuccin-mocha"
///     theme_file "/path/to/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the shortener backend's REST API.
    ///
    /// All request paths are joined onto this URL. Default:
    /// `https://api.tinyurlx.in`
    pub api_base_url: String,

    /// Domain under which short addresses are displayed.
    ///
    /// Used for presentation only; redirects are served by the backend.
    /// Default: `tinyurlx.in`
    pub short_domain: String,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. A leading `~` resolves to the
    /// host's home directory. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            short_domain: DEFAULT_SHORT_DOMAIN.to_string(),
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Zellij provides configuration as a `BTreeMap<String, String>` during
    /// plugin initialization. This function extracts values with fallback
    /// defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `api_base_url`: trimmed of trailing slashes, defaulted when blank
    /// - `short_domain`: defaulted when blank
    /// - `theme`: String → `Option<String>`
    /// - `theme_file`: String → `Option<String>`
    /// - `trace_level`: String → `Option<String>`
    ///
    /// # Example
    ///
    /// ```rust
    /// use linkdeck::Config;
    /// use std::collections::BTreeMap;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_base_url".to_string(), "https://api.example.com/".to_string());
    /// map.insert("theme".to_string(), "catppuccin-latte".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_base_url, "https://api.example.com");
    /// assert_eq!(config.short_domain, "tinyurlx.in");
    /// assert_eq!(config.theme_name.as_deref(), Some("catppuccin-latte"));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let api_base_url = config
            .get("api_base_url")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let short_domain = config
            .get("short_domain")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SHORT_DOMAIN.to_string());

        Self {
            api_base_url,
            short_domain,
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
        }
    }
}

/// Initializes the plugin with configuration.
///
/// Creates a new `AppState` with:
/// - Loaded theme (from file, name, or default)
/// - The configured short domain for address presentation
/// - The login screen active (a cached session may replace it later)
///
/// # Theme Resolution
///
/// 1. `theme_file` if set (tilde paths resolve against the host home)
/// 2. `theme_name` if set and recognized
/// 3. The built-in default (Catppuccin Mocha)
///
/// Failures fall through to the default with a debug log; a broken theme
/// never prevents the plugin from starting.
///
/// # Example
///
/// ```rust
/// use linkdeck::{initialize, Config};
///
/// let config = Config {
///     theme_name: Some("catppuccin-frappe".to_string()),
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// assert_eq!(state.theme.name, "catppuccin-frappe");
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing linkdeck plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(
                Theme::default,
                |theme_name| {
                    Theme::from_name(theme_name).unwrap_or_else(|| {
                        tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                        Theme::default()
                    })
                },
            )
        },
        |theme_file| {
            let path = infrastructure::expand_tilde(theme_file);
            Theme::from_file(&path).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    AppState::new(theme, config.short_domain.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_fill_missing_keys() {
        let config = Config::from_zellij(&BTreeMap::new());

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.short_domain, DEFAULT_SHORT_DOMAIN);
        assert!(config.theme_name.is_none());
        assert!(config.theme_file.is_none());
        assert!(config.trace_level.is_none());
    }

    #[test]
    fn test_config_normalizes_base_url() {
        let mut map = BTreeMap::new();
        map.insert(
            "api_base_url".to_string(),
            " https://api.example.com// ".to_string(),
        );
        map.insert("short_domain".to_string(), "  ".to_string());

        let config = Config::from_zellij(&map);

        assert_eq!(config.api_base_url, "https://api.example.com");
        // Blank values fall back just like missing ones.
        assert_eq!(config.short_domain, DEFAULT_SHORT_DOMAIN);
    }

    #[test]
    fn test_initialize_falls_back_to_default_theme() {
        let config = Config {
            theme_name: Some("no-such-theme".to_string()),
            ..Default::default()
        };

        let state = initialize(&config);

        assert_eq!(state.theme.name, "catppuccin-mocha");
        assert_eq!(state.screen, Screen::Login);
    }
}
