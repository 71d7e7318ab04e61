//! View model types representing renderable UI state.
//!
//! This module defines immutable view models computed from application state,
//! following the MVVM pattern. View models are optimized for rendering and
//! contain pre-computed display information like highlight ranges, masked
//! passwords, and formatted counts.
//!
//! # Architecture
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready data. The
//! top-level [`UIViewModel`] mirrors the two screens of the plugin, so the
//! renderer dispatches on the variant without consulting application state.

/// Complete UI view model for rendering.
///
/// One variant per screen. Computed from `AppState` and handed to the renderer.
#[derive(Debug, Clone)]
pub enum UIViewModel {
    /// Sign-in screen with the login form.
    Login(LoginViewModel),

    /// Link dashboard with stats, filter bar, and the link table.
    Dashboard(DashboardViewModel),
}

/// View model for the sign-in screen.
#[derive(Debug, Clone)]
pub struct LoginViewModel {
    /// Header information (branding).
    pub header: HeaderInfo,

    /// Form fields in display order (email, password).
    ///
    /// The password value arrives pre-masked.
    pub fields: Vec<FieldView>,

    /// Optional banner describing a failed sign-in attempt.
    pub banner: Option<BannerInfo>,

    /// Whether a sign-in request is currently in flight.
    pub busy: bool,

    /// Footer information (keybindings).
    pub footer: FooterInfo,
}

/// View model for the link dashboard.
#[derive(Debug, Clone)]
pub struct DashboardViewModel {
    /// Header information (branding, signed-in user).
    pub header: HeaderInfo,

    /// Stat cards displayed above the table (link count, total clicks).
    pub stats: Vec<StatCard>,

    /// Filter bar state. Always present on the dashboard.
    pub filter_bar: FilterBarInfo,

    /// Visible window of link rows.
    pub rows: Vec<LinkRow>,

    /// Index of the selected row within `rows` (display coordinates).
    pub selected_index: usize,

    /// Create-link dialog, when open. Rendered as an overlay.
    pub dialog: Option<DialogView>,

    /// Optional status banner (outcome of the last operation).
    pub banner: Option<BannerInfo>,

    /// Optional empty state message (no links, or no filter matches).
    pub empty_state: Option<EmptyState>,

    /// Whether link or click data is currently being fetched.
    pub loading: bool,

    /// Footer information (keybindings).
    pub footer: FooterInfo,
}

/// Display information for a single link table row.
#[derive(Debug, Clone)]
pub struct LinkRow {
    /// Link title, truncated to the title column width.
    pub title: String,

    /// Character ranges within `title` to highlight as filter matches.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices,
    /// exclusive end.
    pub highlight_ranges: Vec<(usize, usize)>,

    /// Full short address (scheme, short domain, and slug).
    pub short_address: String,

    /// Destination URL, truncated to the remaining width.
    pub destination: String,

    /// Click count, formatted for display.
    pub clicks: String,

    /// Human-readable age (e.g. "3h ago").
    pub age: String,

    /// Whether the backend generated a QR image for this link.
    pub has_qr: bool,

    /// Whether this row is currently selected.
    pub is_selected: bool,

    /// Whether a delete request for this link is in flight.
    pub is_deleting: bool,
}

/// A single labelled input field within a form or dialog.
#[derive(Debug, Clone)]
pub struct FieldView {
    /// Field label (e.g. "Email").
    pub label: String,

    /// Current field value, display-ready (passwords are masked).
    pub value: String,

    /// Whether this field currently has input focus.
    pub is_focused: bool,

    /// Validation error for this field, if any.
    pub error: Option<String>,
}

/// View model for the create-link dialog overlay.
#[derive(Debug, Clone)]
pub struct DialogView {
    /// Dialog heading text.
    pub heading: String,

    /// Dialog fields in display order (title, long URL, custom alias).
    pub fields: Vec<FieldView>,

    /// Whether the create request is currently in flight.
    pub busy: bool,

    /// Error from a rejected create request (e.g. an alias already in use).
    pub error: Option<String>,
}

/// A labelled stat card shown above the link table.
#[derive(Debug, Clone)]
pub struct StatCard {
    /// Card label (e.g. "Links Created").
    pub label: String,

    /// Formatted value.
    pub value: String,
}

/// Status banner display information.
///
/// Shown after an operation settles (e.g. "Short link created" or a failure).
#[derive(Debug, Clone)]
pub struct BannerInfo {
    /// Banner text.
    pub text: String,

    /// Whether the banner reports a failure (affects color).
    pub is_error: bool,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    /// Title text to display in the header.
    pub title: String,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help text (e.g. "j/k: navigate  /: filter  q: quit").
    pub keybindings: String,
}

/// Empty state message display information.
///
/// Shown in the table area when no links are available.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message (e.g. "No links yet").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Filter bar display information.
#[derive(Debug, Clone)]
pub struct FilterBarInfo {
    /// Current filter query text.
    pub query: String,

    /// Whether the filter bar has input focus.
    pub is_active: bool,
}
