//! Composable UI component renderers.
//!
//! This module provides specialized rendering components for different UI
//! elements, following a component-based architecture. Each component is
//! responsible for rendering a specific part of the interface.
//!
//! # Components
//!
//! - [`header`]: Title bar with branding and the signed-in account
//! - [`footer`]: Help text and keybinding hints
//! - [`stats`]: Stat card band (links created, total clicks)
//! - [`filter`]: Title filter input box
//! - [`table`]: Link list with columns (TITLE, SHORT LINK, CLICKS, AGE, QR, DESTINATION)
//! - [`empty`]: Empty state message for the table area
//! - [`banner`]: Status line (confirmations, errors, loading note)
//! - [`login`]: Sign-in form (credential boxes, status area)
//! - [`dialog`]: Create-link modal overlay
//!
//! # Layout Modes
//!
//! The module provides two high-level layout functions:
//!
//! - [`render_login_screen`]: Header + Tagline + Credential boxes + Footer
//! - [`render_dashboard`]: Header + Stats + Filter + Table + Status + Footer,
//!   with the create dialog drawn on top when open

mod banner;
mod dialog;
mod empty;
mod filter;
mod footer;
mod header;
mod login;
mod stats;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DashboardViewModel, LoginViewModel};

use banner::render_status_line;
use dialog::render_dialog;
use empty::render_empty_state;
use filter::render_filter_bar;
use footer::render_footer;
use header::render_header;
use login::{render_login_fields, render_login_status, render_tagline};
use stats::render_stats;
use table::{render_table_headers, render_table_rows};

/// Renders a horizontal border line at the specified row.
///
/// Used to separate UI sections (header/body, body/footer).
///
/// # Parameters
///
/// * `row` - Row position to render the border (1-indexed)
/// * `color` - Hex color for the border
/// * `cols` - Terminal width in columns
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the sign-in screen layout.
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [blank line]
/// [Tagline]
/// [blank line]
/// [Credential boxes with validation lines]
/// [Status: busy indicator or rejection banner]
/// [Border]
/// [Footer]
/// ```
///
/// # Parameters
///
/// * `vm` - Login view model
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
/// * `rows` - Terminal height in rows
pub fn render_login_screen(vm: &LoginViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // Start at row 2 (skip blank line at row 1)

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_tagline(current_row + 1, theme, cols);
    current_row = render_login_fields(current_row + 1, &vm.fields, theme, cols);
    render_login_status(current_row, vm.banner.as_ref(), vm.busy, theme, cols);

    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}

/// Renders the dashboard layout.
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Stats band - 3 lines]
/// [Filter box - 3 lines]
/// [Table Headers]
/// [Table Rows or Empty State]
/// [Status line]
/// [Border]
/// [Footer]
/// ```
///
/// While links or clicks are being fetched, the border under the header
/// renders in the accent color as a full-width loading bar. The create
/// dialog, when open, is drawn last so it overlays the table.
///
/// # Parameters
///
/// * `vm` - Dashboard view model
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
/// * `rows` - Terminal height in rows
pub fn render_dashboard(vm: &DashboardViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // Start at row 2 (skip blank line at row 1)

    let top_border_color = if vm.loading {
        &theme.colors.filter_bar_border
    } else {
        &theme.colors.border
    };

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, top_border_color, cols);
    current_row = render_stats(current_row, &vm.stats, theme, cols);
    current_row = render_filter_bar(current_row, &vm.filter_bar, theme, cols);
    current_row = render_table_headers(current_row, theme);

    if let Some(empty) = &vm.empty_state {
        render_empty_state(current_row, empty, theme, cols);
    } else {
        render_table_rows(current_row, &vm.rows, theme, cols);
    }

    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);
    let status_row = border_row.saturating_sub(1);

    render_status_line(status_row, vm.banner.as_ref(), vm.loading, theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);

    if let Some(dialog) = &vm.dialog {
        render_dialog(dialog, theme, cols, rows);
    }
}
