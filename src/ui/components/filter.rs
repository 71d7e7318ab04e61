//! Filter bar component renderer.
//!
//! This module renders the title filter input box. The box is always visible
//! on the dashboard; its border color signals whether the filter is currently
//! being edited.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FilterBarInfo;

/// Horizontal margin for the filter box (spaces on left and right).
const FILTER_BOX_MARGIN: usize = 5;

/// Renders the filter input box at the specified row.
///
/// Displays a 3-line bordered box containing the filter query text. While the
/// filter is being edited the border uses the accent color and a cursor
/// marker follows the query.
///
/// # Parameters
///
/// * `row` - Starting row position for the filter box (1-indexed)
/// * `filter` - Filter bar information (query text, edit state)
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
///
/// # Returns
///
/// The next available row position (row + 3, since the box uses 3 lines)
///
/// # Layout
///
/// ```text
/// [margin] ┌─────────────────┐ [margin]
/// [margin] │ Filter: blog_   │ [margin]
/// [margin] └─────────────────┘ [margin]
/// ```
///
/// The box width is calculated as `cols - (2 * FILTER_BOX_MARGIN)`. The inner
/// content width is `box_width - 2` (accounting for left and right borders).
pub fn render_filter_bar(row: usize, filter: &FilterBarInfo, theme: &Theme, cols: usize) -> usize {
    let border_color = if filter.is_active {
        &theme.colors.filter_bar_border
    } else {
        &theme.colors.border
    };

    let box_width = cols.saturating_sub(FILTER_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);

    position_cursor(row, 1);
    print!("{}", " ".repeat(FILTER_BOX_MARGIN));
    print!("{}", Theme::fg(border_color));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let cursor = if filter.is_active { "_" } else { "" };
    let filter_text = format!(" Filter: {}{}", filter.query, cursor);
    let padding = inner_width.saturating_sub(filter_text.chars().count());

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(FILTER_BOX_MARGIN));
    print!("{}", Theme::fg(border_color));
    print!("│");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{filter_text}");
    print!("{}", " ".repeat(padding));
    print!("{}", Theme::fg(border_color));
    print!("│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(FILTER_BOX_MARGIN));
    print!("{}", Theme::fg(border_color));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}
