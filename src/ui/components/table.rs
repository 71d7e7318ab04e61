//! Link table component renderer.
//!
//! This module renders the link list as a six-column table: title, short
//! address, click count, age, QR availability, and destination URL. It
//! supports selection highlighting and filter match highlighting.

use crate::ui::helpers::{self, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::LinkRow;

/// TITLE column width (content is pre-truncated to fit).
const TITLE_WIDTH: usize = 22;
/// SHORT LINK column width.
const SHORT_WIDTH: usize = 26;
/// CLICKS column width.
const CLICKS_WIDTH: usize = 8;
/// AGE column width.
const AGE_WIDTH: usize = 10;
/// QR indicator column width.
const QR_WIDTH: usize = 4;

/// Renders the table column headers at the specified row.
///
/// Displays the column headers with bold styling and theme colors, using the
/// same fixed widths as the data rows.
///
/// # Parameters
///
/// * `row` - Row position to render the headers (1-indexed)
/// * `theme` - Active color theme
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_table_headers(row: usize, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!(
        "{:<TITLE_WIDTH$}{:<SHORT_WIDTH$}{:<CLICKS_WIDTH$}{:<AGE_WIDTH$}{:<QR_WIDTH$}{}",
        "TITLE", "SHORT LINK", "CLICKS", "AGE", "QR", "DESTINATION"
    );
    print!("{}", Theme::reset());
    row + 1
}

/// Renders all table rows starting at the specified row.
///
/// Iterates through the visible link rows and renders each with proper
/// selection and highlight styling.
///
/// # Parameters
///
/// * `row` - Starting row position for the table (1-indexed)
/// * `items` - Visible link rows to render
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns (for padding)
///
/// # Returns
///
/// The next available row position (row + number of items)
pub fn render_table_rows(row: usize, items: &[LinkRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, item, theme, cols);
    }
    current_row
}

/// Renders a single link row at the specified row position.
///
/// # Layout
///
/// ```text
/// TITLE (22) SHORT LINK (26) CLICKS (8) AGE (10) QR (4) DESTINATION [padding]
/// ```
///
/// # Styling Precedence
///
/// 1. Selection colors (full row foreground and background)
/// 2. Filter match highlights on the title (suppressed when selected)
/// 3. Normal text color
///
/// A row whose link is being deleted renders dimmed. The row is padded to
/// fill the entire terminal width so the selection background covers the
/// whole line.
fn render_table_row(row: usize, item: &LinkRow, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    if item.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }
    if item.is_deleting {
        print!("{}", Theme::dim());
    }

    if item.highlight_ranges.is_empty() {
        print!("{}", item.title);
    } else {
        helpers::render_highlighted_text(
            &item.title,
            &item.highlight_ranges,
            theme,
            item.is_selected,
        );
    }
    let title_len = item.title.chars().count();
    print!("{}", " ".repeat(TITLE_WIDTH.saturating_sub(title_len)));

    print!("{:<SHORT_WIDTH$}", item.short_address);
    print!("{:<CLICKS_WIDTH$}", item.clicks);
    print!("{:<AGE_WIDTH$}", item.age);
    print!("{:<QR_WIDTH$}", if item.has_qr { "*" } else { "" });
    print!("{}", item.destination);

    let fixed = TITLE_WIDTH + SHORT_WIDTH + CLICKS_WIDTH + AGE_WIDTH + QR_WIDTH;
    let line_len = fixed + item.destination.chars().count();
    print!("{}", " ".repeat(cols.saturating_sub(line_len)));

    print!("{}", Theme::reset());
    row + 1
}
