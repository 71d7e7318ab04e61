//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the central state container for the plugin,
//! along with methods for filtering, selection management, and UI view model
//! generation. It serves as the single source of truth for all transient UI state.
//!
//! # Architecture
//!
//! `AppState` separates core data (the master link list, click counts, the
//! session) from derived state (filtered links, selected index) to maintain
//! consistency and simplify state transitions. Every network operation is
//! tracked by its own [`RemoteData`] wrapper, so a settling response can be
//! matched against the request generation that issued it and stale responses
//! are discarded without touching displayed data.
//!
//! # State Components
//!
//! - **Session**: The authenticated user, `None` while on the login screen
//! - **Links**: Master list of the user's links, newest first
//! - **Filtered Links**: Subset after applying the title filter
//! - **Selection**: Current cursor position within filtered results
//! - **Forms**: Login form and create-link dialog state
//! - **Requests**: One `RemoteData` per backend operation
//!
//! # View Model Computation
//!
//! The `compute_viewmodel` method transforms state into a renderable UI
//! representation, handling windowing, filter match highlighting, and
//! responsive layout adjustments based on terminal dimensions.

use std::collections::HashMap;

use crate::app::forms::{CreateField, CreateLinkForm, LoginField, LoginForm};
use crate::app::modes::{InputMode, Screen};
use crate::domain::{ApiError, ClickRecord, Link, RemoteData, Session};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    BannerInfo, DashboardViewModel, DialogView, EmptyState, FieldView, FilterBarInfo, FooterInfo,
    HeaderInfo, LinkRow, LoginViewModel, StatCard, UIViewModel,
};

/// Severity of a status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Successful or neutral outcome.
    Info,
    /// Failed operation.
    Error,
}

/// A transient status banner describing the outcome of the last operation.
///
/// Set by the event handler when an operation settles, dismissed by Esc in
/// normal mode or replaced when a newer operation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// Central application state container.
///
/// Holds all transient UI state including the link list, filters, selection,
/// forms, and per-operation request tracking. Mutated by the event handler in
/// response to user input and system events. View models are computed
/// on-demand from state snapshots.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Screen the plugin is currently presenting.
    pub screen: Screen,

    /// Current input handling mode within the dashboard.
    pub input_mode: InputMode,

    /// The authenticated session, `None` while signed out.
    pub session: Option<Session>,

    /// Master list of the user's links, sorted newest first.
    ///
    /// Only replaced when a fetch succeeds. A failed or superseded fetch
    /// leaves the previously displayed links untouched.
    pub links: Vec<Link>,

    /// Links matching the current title filter.
    ///
    /// Recomputed by `apply_filter()` after state changes. Used for rendering
    /// and selection bounds checking.
    pub filtered_links: Vec<Link>,

    /// Zero-based index of the selected link within `filtered_links`.
    ///
    /// Clamped to valid bounds by `apply_filter()`. Wraps around during
    /// navigation via `move_selection_up/down()`.
    pub selected_index: usize,

    /// Click counts per link id, aggregated from fetched click records.
    pub click_counts: HashMap<String, usize>,

    /// Total clicks across all links.
    pub total_clicks: usize,

    /// Current title filter query.
    ///
    /// Accumulated by `Char` events in filter mode, reduced by `Backspace`,
    /// cleared by `Escape`.
    pub filter_query: String,

    /// Sign-in form state.
    pub login_form: LoginForm,

    /// Create-link dialog state.
    pub create_form: CreateLinkForm,

    /// Id of the link with a delete request in flight, if any.
    pub pending_delete: Option<String>,

    /// Id of the most recently created link.
    ///
    /// Consumed by the next successful fetch to move the selection onto the
    /// new row.
    pub last_created: Option<String>,

    /// Transient status banner, if any.
    pub status: Option<StatusLine>,

    /// Sign-in request tracking.
    pub login_request: RemoteData<Session, ApiError>,

    /// Sign-out request tracking.
    pub logout_request: RemoteData<(), ApiError>,

    /// Link list fetch tracking.
    pub links_request: RemoteData<Vec<Link>, ApiError>,

    /// Click records fetch tracking.
    pub clicks_request: RemoteData<Vec<ClickRecord>, ApiError>,

    /// Create-link request tracking.
    pub create_request: RemoteData<Link, ApiError>,

    /// Delete-link request tracking.
    pub delete_request: RemoteData<(), ApiError>,

    /// QR image download tracking.
    pub qr_request: RemoteData<Vec<u8>, ApiError>,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// Domain that serves short links (e.g. "tinyurlx.in").
    pub short_domain: String,
}

impl AppState {
    /// Creates a new application state on the login screen.
    ///
    /// All collections start empty and every request wrapper starts idle.
    ///
    /// # Parameters
    ///
    /// * `theme` - Color scheme for UI rendering
    /// * `short_domain` - Domain that serves short links
    #[must_use]
    pub fn new(theme: Theme, short_domain: String) -> Self {
        Self {
            screen: Screen::Login,
            input_mode: InputMode::Normal,
            session: None,
            links: vec![],
            filtered_links: vec![],
            selected_index: 0,
            click_counts: HashMap::new(),
            total_clicks: 0,
            filter_query: String::new(),
            login_form: LoginForm::new(),
            create_form: CreateLinkForm::new(),
            pending_delete: None,
            last_created: None,
            status: None,
            login_request: RemoteData::new(),
            logout_request: RemoteData::new(),
            links_request: RemoteData::new(),
            clicks_request: RemoteData::new(),
            create_request: RemoteData::new(),
            delete_request: RemoteData::new(),
            qr_request: RemoteData::new(),
            theme,
            short_domain,
        }
    }

    /// Moves the selection cursor down by one position, wrapping to the top.
    ///
    /// No-op if the filtered link list is empty.
    pub fn move_selection_down(&mut self) {
        if self.filtered_links.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.filtered_links.len();
    }

    /// Moves the selection cursor up by one position, wrapping to the bottom.
    ///
    /// No-op if the filtered link list is empty.
    pub fn move_selection_up(&mut self) {
        if self.filtered_links.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.filtered_links.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Returns a reference to the currently selected link, if any.
    #[must_use]
    pub fn selected_link(&self) -> Option<&Link> {
        self.filtered_links.get(self.selected_index)
    }

    /// Replaces the master link list and reapplies the filter.
    ///
    /// Links are sorted newest first so fresh creations surface at the top of
    /// the table.
    pub fn replace_links(&mut self, mut links: Vec<Link>) {
        links.sort_by_key(|link| std::cmp::Reverse(link.created_timestamp()));
        self.links = links;
        self.apply_filter();
    }

    /// Moves the selection onto the link with the given id.
    ///
    /// Returns false when the link is not in the filtered list.
    pub fn select_link(&mut self, id: &str) -> bool {
        match self.filtered_links.iter().position(|link| link.id == id) {
            Some(index) => {
                self.selected_index = index;
                true
            }
            None => false,
        }
    }

    /// Rebuilds per-link click counts and the total from fetched records.
    pub fn rebuild_click_stats(&mut self, records: &[ClickRecord]) {
        self.click_counts.clear();
        for record in records {
            *self.click_counts.entry(record.url_id.clone()).or_insert(0) += 1;
        }
        self.total_clicks = records.len();
    }

    /// Returns the click count for a link id, zero when unknown.
    #[must_use]
    pub fn clicks_for(&self, id: &str) -> usize {
        self.click_counts.get(id).copied().unwrap_or(0)
    }

    /// Applies the title filter to the master link list.
    ///
    /// Matching is a case-insensitive substring test against the link title
    /// only; addresses and destinations are not searched. Updates
    /// `filtered_links` and clamps `selected_index` to valid bounds.
    ///
    /// # Tracing
    ///
    /// Creates a debug-level span with total links and query length.
    pub fn apply_filter(&mut self) {
        let _span = tracing::debug_span!(
            "apply_filter",
            total_links = self.links.len(),
            query_len = self.filter_query.len(),
        )
        .entered();

        if self.filter_query.is_empty() {
            self.filtered_links = self.links.clone();
        } else {
            self.filtered_links = self
                .links
                .iter()
                .filter(|link| title_matches(&link.title, &self.filter_query))
                .cloned()
                .collect();
        }

        if self.filtered_links.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.filtered_links.len() - 1);
        }

        tracing::debug!(
            filtered_count = self.filtered_links.len(),
            "title filter applied"
        );
    }

    /// Tears the state down to a fresh login screen.
    ///
    /// Keeps the theme and short domain, drops everything else. Resetting the
    /// request wrappers means any response still in flight settles against a
    /// fresh generation and is discarded.
    pub fn reset_for_logout(&mut self) {
        let theme = self.theme.clone();
        let short_domain = std::mem::take(&mut self.short_domain);
        *self = Self::new(theme, short_domain);
    }

    /// Computes a renderable UI view model from current state and terminal
    /// dimensions.
    ///
    /// Dispatches on the active screen. The dashboard variant handles
    /// windowing (showing a subset of rows centered on the selection), filter
    /// match highlighting, and responsive destination truncation.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        match self.screen {
            Screen::Login => UIViewModel::Login(self.compute_login_view()),
            Screen::Dashboard => UIViewModel::Dashboard(self.compute_dashboard_view(rows, cols)),
        }
    }

    /// Computes the sign-in screen view model.
    ///
    /// The password value is masked before it reaches the renderer. A failed
    /// sign-in attempt surfaces as an error banner with the backend message.
    fn compute_login_view(&self) -> LoginViewModel {
        let fields = vec![
            FieldView {
                label: "Email".to_string(),
                value: self.login_form.email.clone(),
                is_focused: self.login_form.focus == LoginField::Email,
                error: self.login_form.error(LoginField::Email).map(str::to_string),
            },
            FieldView {
                label: "Password".to_string(),
                value: "*".repeat(self.login_form.password.chars().count()),
                is_focused: self.login_form.focus == LoginField::Password,
                error: self
                    .login_form
                    .error(LoginField::Password)
                    .map(str::to_string),
            },
        ];

        let banner = self.login_request.error().map(|err| BannerInfo {
            text: format!("Sign-in failed: {}", err.message),
            is_error: true,
        });

        LoginViewModel {
            header: HeaderInfo {
                title: " linkdeck ".to_string(),
            },
            fields,
            banner,
            busy: self.login_request.is_loading(),
            footer: self.compute_footer(),
        }
    }

    /// Computes the dashboard view model.
    ///
    /// # Windowing Algorithm
    ///
    /// 1. Calculate available rows after subtracting UI chrome
    /// 2. Center the window around the selected index
    /// 3. Adjust the window if near the end to maximize visible rows
    /// 4. Compute the relative selection index within the visible window
    fn compute_dashboard_view(&self, rows: usize, cols: usize) -> DashboardViewModel {
        let available_rows = calculate_available_rows(rows);

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(self.filtered_links.len());

        let actual_count = visible_end - visible_start;
        if actual_count < available_rows && self.filtered_links.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let link_rows: Vec<LinkRow> = self.filtered_links[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(relative_idx, link)| {
                self.compute_link_row(link, visible_start + relative_idx, cols)
            })
            .collect();

        let selected_display_index = self.selected_index.saturating_sub(visible_start);

        DashboardViewModel {
            header: self.compute_header(),
            stats: self.compute_stats(),
            filter_bar: FilterBarInfo {
                query: self.filter_query.clone(),
                is_active: self.input_mode == InputMode::Filter,
            },
            rows: link_rows,
            selected_index: selected_display_index,
            dialog: self.compute_dialog(),
            banner: self.status.as_ref().map(|status| BannerInfo {
                text: status.text.clone(),
                is_error: status.kind == StatusKind::Error,
            }),
            empty_state: self.compute_empty_state(),
            loading: self.links_request.is_loading() || self.clicks_request.is_loading(),
            footer: self.compute_footer(),
        }
    }

    /// Computes a display row for a single link within the visible window.
    ///
    /// Handles title truncation, destination truncation, filter match
    /// highlighting, and selection and deletion marking.
    fn compute_link_row(&self, link: &Link, absolute_idx: usize, cols: usize) -> LinkRow {
        const TITLE_COLUMN_WIDTH: usize = 22;
        // Title (22) + short link (26) + clicks (8) + age (10) + QR (4).
        const FIXED_COLUMNS_WIDTH: usize = 70;
        const SAFETY_MARGIN: usize = 2;

        let is_selected = absolute_idx == self.selected_index;
        let is_deleting = self.pending_delete.as_deref() == Some(link.id.as_str());
        let max_destination_width = cols.saturating_sub(FIXED_COLUMNS_WIDTH + SAFETY_MARGIN);

        let title = truncate_chars(&link.title, TITLE_COLUMN_WIDTH.saturating_sub(2));
        let short_address = truncate_chars(&link.short_address(&self.short_domain), 24);
        let destination = truncate_chars(&link.original_url, max_destination_width);

        let highlight_ranges = if self.filter_query.is_empty() {
            vec![]
        } else {
            compute_highlight_ranges(&title, &self.filter_query)
        };

        LinkRow {
            title,
            highlight_ranges,
            short_address,
            destination,
            clicks: self.clicks_for(&link.id).to_string(),
            age: link.created_ago(),
            has_qr: link.qr.is_some(),
            is_selected,
            is_deleting,
        }
    }

    /// Computes header information with branding and the signed-in user.
    fn compute_header(&self) -> HeaderInfo {
        let title = match &self.session {
            Some(session) => format!(" linkdeck · {} ", session.user.email),
            None => " linkdeck ".to_string(),
        };
        HeaderInfo { title }
    }

    /// Computes the stat cards shown above the table.
    fn compute_stats(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                label: "Links Created".to_string(),
                value: self.links.len().to_string(),
            },
            StatCard {
                label: "Total Clicks".to_string(),
                value: self.total_clicks.to_string(),
            },
        ]
    }

    /// Computes the create-link dialog view model when the dialog is open.
    ///
    /// A rejected create request keeps the dialog open and surfaces the
    /// backend message (e.g. an alias already in use) inside the dialog.
    fn compute_dialog(&self) -> Option<DialogView> {
        if self.input_mode != InputMode::Dialog {
            return None;
        }

        let fields = vec![
            FieldView {
                label: "Title".to_string(),
                value: self.create_form.title.clone(),
                is_focused: self.create_form.focus == CreateField::Title,
                error: self
                    .create_form
                    .error(CreateField::Title)
                    .map(str::to_string),
            },
            FieldView {
                label: "Long URL".to_string(),
                value: self.create_form.long_url.clone(),
                is_focused: self.create_form.focus == CreateField::LongUrl,
                error: self
                    .create_form
                    .error(CreateField::LongUrl)
                    .map(str::to_string),
            },
            FieldView {
                label: "Custom alias (optional)".to_string(),
                value: self.create_form.custom_url.clone(),
                is_focused: self.create_form.focus == CreateField::CustomUrl,
                error: self
                    .create_form
                    .error(CreateField::CustomUrl)
                    .map(str::to_string),
            },
        ];

        Some(DialogView {
            heading: " New short link ".to_string(),
            fields,
            busy: self.create_request.is_loading(),
            error: self.create_request.error().map(|err| err.message.clone()),
        })
    }

    /// Computes the empty state message for the table area, if applicable.
    ///
    /// Suppressed while the first fetch is still loading so a fresh dashboard
    /// does not flash "No links yet" before data arrives.
    fn compute_empty_state(&self) -> Option<EmptyState> {
        if !self.filtered_links.is_empty() {
            return None;
        }
        if self.links.is_empty() && self.links_request.is_loading() {
            return None;
        }

        if self.links.is_empty() {
            Some(EmptyState {
                message: "No links yet".to_string(),
                subtitle: "Press 'n' to create your first short link".to_string(),
            })
        } else {
            Some(EmptyState {
                message: format!("No links match '{}'", self.filter_query),
                subtitle: "Press ESC to clear the filter".to_string(),
            })
        }
    }

    /// Computes footer keybinding text for the current screen and mode.
    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.screen, self.input_mode) {
            (Screen::Login, _) => {
                "Tab: next field  Enter: sign in  Esc: close  Type to edit".to_string()
            }
            (Screen::Dashboard, InputMode::Normal) => {
                "j/k: navigate  /: filter  n: new  d: delete  g: QR  r: refresh  L: logout  q: quit"
                    .to_string()
            }
            (Screen::Dashboard, InputMode::Filter) => {
                "ESC: clear filter  Enter: keep filter  Type to filter".to_string()
            }
            (Screen::Dashboard, InputMode::Dialog) => {
                "Tab: next field  Enter: create  Esc: cancel".to_string()
            }
        };

        FooterInfo { keybindings }
    }
}

/// Calculates rows available for the link table after subtracting UI chrome.
///
/// Accounts for the blank top line, header, borders, the stats band (3 rows),
/// the filter bar (3 rows), the table header row, the status line, the footer,
/// and the trailing blank line the footer sits above.
const fn calculate_available_rows(total_rows: usize) -> usize {
    total_rows.saturating_sub(14)
}

/// Lowercases a character without changing the character count.
///
/// Multi-character expansions keep their first character so highlight
/// indices stay aligned with the original text.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Returns true when `query` occurs in `title`, ignoring case.
fn title_matches(title: &str, query: &str) -> bool {
    let haystack: Vec<char> = title.chars().map(fold_char).collect();
    let needle: Vec<char> = query.chars().map(fold_char).collect();

    if needle.is_empty() || needle.len() > haystack.len() {
        return needle.is_empty();
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Computes character index ranges where `query` occurs in `text`.
///
/// Matching is case-insensitive and non-overlapping. Returned tuples are
/// `(start, end)` character indices with exclusive end, ready for the
/// highlight renderer.
fn compute_highlight_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let haystack: Vec<char> = text.chars().map(fold_char).collect();
    let needle: Vec<char> = query.chars().map(fold_char).collect();

    if needle.is_empty() || needle.len() > haystack.len() {
        return vec![];
    }

    let mut ranges = Vec::new();
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == needle[..] {
            ranges.push((i, i + needle.len()));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}

/// Truncates a string to `max_chars` characters, appending "..." when cut.
///
/// Counts characters rather than bytes so multibyte titles cannot split a
/// code point.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let prefix: String = text.chars().take(keep).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;

    fn make_link(id: &str, title: &str, created_at: &str) -> Link {
        Link {
            id: id.to_string(),
            title: title.to_string(),
            original_url: format!("https://example.com/{id}"),
            short_url: format!("s-{id}"),
            custom_url: None,
            qr: None,
            user_id: "u1".to_string(),
            created_at: created_at.to_string(),
        }
    }

    fn make_click(id: &str, url_id: &str) -> ClickRecord {
        ClickRecord {
            id: id.to_string(),
            url_id: url_id.to_string(),
            city: None,
            device: None,
            created_at: "2024-03-01T00:00:00Z".to_string(),
        }
    }

    fn dashboard_state() -> AppState {
        let mut state = AppState::new(Theme::default(), "tinyurlx.in".to_string());
        state.screen = Screen::Dashboard;
        state.session = Some(Session {
            access_token: "tok".to_string(),
            user: User {
                id: "u1".to_string(),
                email: "user@example.com".to_string(),
            },
            expires_at: None,
        });
        state
    }

    #[test]
    fn test_new_starts_on_login_screen() {
        let state = AppState::new(Theme::default(), "tinyurlx.in".to_string());
        assert_eq!(state.screen, Screen::Login);
        assert!(state.session.is_none());
        assert!(state.links.is_empty());
        assert!(!state.links_request.is_loading());
    }

    #[test]
    fn test_replace_links_sorts_newest_first() {
        let mut state = dashboard_state();
        state.replace_links(vec![
            make_link("old", "Old", "2024-01-01T00:00:00Z"),
            make_link("new", "New", "2024-06-01T00:00:00Z"),
            make_link("mid", "Mid", "2024-03-01T00:00:00Z"),
        ]);

        let order: Vec<&str> = state.links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
        assert_eq!(state.filtered_links.len(), 3);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring_on_title() {
        let mut state = dashboard_state();
        state.replace_links(vec![
            make_link("a", "My Blog Post", "2024-01-01T00:00:00Z"),
            make_link("b", "Conference slides", "2024-01-02T00:00:00Z"),
            make_link("c", "blog archive", "2024-01-03T00:00:00Z"),
        ]);

        state.filter_query = "BLOG".to_string();
        state.apply_filter();

        let titles: Vec<&str> = state
            .filtered_links
            .iter()
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(titles, vec!["blog archive", "My Blog Post"]);
    }

    #[test]
    fn test_filter_does_not_search_urls() {
        let mut state = dashboard_state();
        state.replace_links(vec![make_link("a", "Slides", "2024-01-01T00:00:00Z")]);

        // Destination is https://example.com/a; a URL fragment must not match.
        state.filter_query = "example".to_string();
        state.apply_filter();
        assert!(state.filtered_links.is_empty());
    }

    #[test]
    fn test_filter_clamps_selection() {
        let mut state = dashboard_state();
        state.replace_links(vec![
            make_link("a", "Alpha", "2024-01-03T00:00:00Z"),
            make_link("b", "Beta", "2024-01-02T00:00:00Z"),
            make_link("c", "Alpine", "2024-01-01T00:00:00Z"),
        ]);
        state.selected_index = 2;

        state.filter_query = "Al".to_string();
        state.apply_filter();
        assert_eq!(state.filtered_links.len(), 2);
        assert_eq!(state.selected_index, 1);
    }

    #[test]
    fn test_selection_wraps_both_directions() {
        let mut state = dashboard_state();
        state.replace_links(vec![
            make_link("a", "Alpha", "2024-01-02T00:00:00Z"),
            make_link("b", "Beta", "2024-01-01T00:00:00Z"),
        ]);

        assert_eq!(state.selected_index, 0);
        state.move_selection_up();
        assert_eq!(state.selected_index, 1);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_select_link_by_id() {
        let mut state = dashboard_state();
        state.replace_links(vec![
            make_link("a", "Alpha", "2024-01-02T00:00:00Z"),
            make_link("b", "Beta", "2024-01-01T00:00:00Z"),
        ]);

        assert!(state.select_link("b"));
        assert_eq!(state.selected_link().map(|l| l.id.as_str()), Some("b"));
        assert!(!state.select_link("missing"));
    }

    #[test]
    fn test_rebuild_click_stats_counts_per_link() {
        let mut state = dashboard_state();
        state.rebuild_click_stats(&[
            make_click("c1", "a"),
            make_click("c2", "a"),
            make_click("c3", "b"),
        ]);

        assert_eq!(state.clicks_for("a"), 2);
        assert_eq!(state.clicks_for("b"), 1);
        assert_eq!(state.clicks_for("zzz"), 0);
        assert_eq!(state.total_clicks, 3);
    }

    #[test]
    fn test_reset_for_logout_discards_in_flight_requests() {
        let mut state = dashboard_state();
        state.replace_links(vec![make_link("a", "Alpha", "2024-01-01T00:00:00Z")]);
        let generation = state.links_request.begin();

        state.reset_for_logout();

        assert_eq!(state.screen, Screen::Login);
        assert!(state.session.is_none());
        assert!(state.links.is_empty());
        assert_eq!(state.short_domain, "tinyurlx.in");
        assert!(!state.links_request.settle(generation, Ok(vec![])));
    }

    #[test]
    fn test_login_viewmodel_masks_password() {
        let mut state = AppState::new(Theme::default(), "tinyurlx.in".to_string());
        state.login_form.email = "user@example.com".to_string();
        state.login_form.password = "secret".to_string();
        state.login_form.focus = LoginField::Password;

        let UIViewModel::Login(view) = state.compute_viewmodel(24, 80) else {
            panic!("expected login view");
        };

        assert_eq!(view.fields[0].value, "user@example.com");
        assert!(!view.fields[0].is_focused);
        assert_eq!(view.fields[1].value, "******");
        assert!(view.fields[1].is_focused);
        assert!(!view.busy);
        assert!(view.banner.is_none());
    }

    #[test]
    fn test_login_viewmodel_surfaces_rejection_banner() {
        let mut state = AppState::new(Theme::default(), "tinyurlx.in".to_string());
        let generation = state.login_request.begin();
        assert!(state
            .login_request
            .settle(generation, Err(ApiError::new(401, "invalid credentials"))));

        let UIViewModel::Login(view) = state.compute_viewmodel(24, 80) else {
            panic!("expected login view");
        };

        let banner = view.banner.unwrap();
        assert_eq!(banner.text, "Sign-in failed: invalid credentials");
        assert!(banner.is_error);
    }

    #[test]
    fn test_dashboard_viewmodel_stats_and_rows() {
        let mut state = dashboard_state();
        state.replace_links(vec![
            make_link("a", "Alpha", "2024-01-02T00:00:00Z"),
            make_link("b", "Beta", "2024-01-01T00:00:00Z"),
        ]);
        state.rebuild_click_stats(&[make_click("c1", "a"), make_click("c2", "a")]);

        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };

        assert_eq!(view.header.title, " linkdeck · user@example.com ");
        assert_eq!(view.stats[0].value, "2");
        assert_eq!(view.stats[1].value, "2");
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].title, "Alpha");
        assert_eq!(view.rows[0].clicks, "2");
        assert_eq!(view.rows[0].short_address, "https://tinyurlx.in/s-a");
        assert!(view.rows[0].is_selected);
        assert!(!view.rows[1].is_selected);
        assert!(view.empty_state.is_none());
    }

    #[test]
    fn test_dashboard_viewmodel_windows_around_selection() {
        let mut state = dashboard_state();
        let links: Vec<Link> = (0..40)
            .map(|i| {
                make_link(
                    &format!("l{i:02}"),
                    &format!("Link {i:02}"),
                    "2024-01-01T00:00:00Z",
                )
            })
            .collect();
        state.replace_links(links);
        state.selected_index = 35;

        // 24 terminal rows leave 10 rows for the table.
        let UIViewModel::Dashboard(view) = state.compute_viewmodel(24, 100) else {
            panic!("expected dashboard view");
        };

        assert_eq!(view.rows.len(), 10);
        assert!(view.rows[view.selected_index].is_selected);
        assert_eq!(view.rows.iter().filter(|r| r.is_selected).count(), 1);
    }

    #[test]
    fn test_dashboard_highlights_are_char_indexed() {
        let mut state = dashboard_state();
        state.replace_links(vec![make_link("a", "Café guide", "2024-01-01T00:00:00Z")]);
        state.filter_query = "café".to_string();
        state.apply_filter();

        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };

        assert_eq!(view.rows[0].highlight_ranges, vec![(0, 4)]);
    }

    #[test]
    fn test_highlight_ranges_cover_every_occurrence() {
        assert_eq!(
            compute_highlight_ranges("blog blog", "blog"),
            vec![(0, 4), (5, 9)]
        );
    }

    #[test]
    fn test_dashboard_empty_states() {
        let mut state = dashboard_state();

        // No links and nothing loading.
        state.apply_filter();
        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };
        assert_eq!(view.empty_state.unwrap().message, "No links yet");

        // First fetch in flight suppresses the message.
        state.links_request.begin();
        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };
        assert!(view.empty_state.is_none());
        assert!(view.loading);

        // Filter mismatch names the query.
        let generation = state.links_request.generation();
        assert!(state.links_request.settle(
            generation,
            Ok(vec![make_link("a", "Alpha", "2024-01-01T00:00:00Z")])
        ));
        state.replace_links(vec![make_link("a", "Alpha", "2024-01-01T00:00:00Z")]);
        state.filter_query = "zzz".to_string();
        state.apply_filter();
        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };
        assert_eq!(view.empty_state.unwrap().message, "No links match 'zzz'");
    }

    #[test]
    fn test_dashboard_marks_deleting_row() {
        let mut state = dashboard_state();
        state.replace_links(vec![
            make_link("a", "Alpha", "2024-01-02T00:00:00Z"),
            make_link("b", "Beta", "2024-01-01T00:00:00Z"),
        ]);
        state.pending_delete = Some("b".to_string());

        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };

        assert!(!view.rows[0].is_deleting);
        assert!(view.rows[1].is_deleting);
    }

    #[test]
    fn test_dialog_viewmodel_carries_backend_rejection() {
        let mut state = dashboard_state();
        state.input_mode = InputMode::Dialog;
        let generation = state.create_request.begin();
        assert!(state
            .create_request
            .settle(generation, Err(ApiError::new(409, "duplicate alias"))));

        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };

        let dialog = view.dialog.unwrap();
        assert_eq!(dialog.error.as_deref(), Some("duplicate alias"));
        assert_eq!(dialog.fields.len(), 3);
    }

    #[test]
    fn test_footer_changes_with_mode() {
        let mut state = dashboard_state();
        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };
        assert!(view.footer.keybindings.contains("L: logout"));

        state.input_mode = InputMode::Filter;
        let UIViewModel::Dashboard(view) = state.compute_viewmodel(30, 100) else {
            panic!("expected dashboard view");
        };
        assert!(view.footer.keybindings.contains("Type to filter"));
    }

    #[test]
    fn test_truncate_chars_is_multibyte_safe() {
        assert_eq!(truncate_chars("héllo wörld", 20), "héllo wörld");
        assert_eq!(truncate_chars("éééééééééé", 8), "ééééé...");
    }
}
