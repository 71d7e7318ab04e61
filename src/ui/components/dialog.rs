//! Create-link dialog renderer.
//!
//! This module renders the centered modal dialog for creating a short link.
//! The dialog is drawn last so it sits on top of the table; every interior
//! line is padded to the full box width to mask the content behind it.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DialogView;

/// Total dialog height in rows: borders, heading, spacer, three fields with
/// their message lines, and the status line.
const DIALOG_HEIGHT: usize = 11;

/// Widest the dialog gets on large terminals.
const MAX_DIALOG_WIDTH: usize = 64;

/// Renders the create-link dialog centered in the terminal.
///
/// # Parameters
///
/// * `dialog` - Dialog view model (heading, fields, busy flag, backend error)
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
/// * `rows` - Terminal height in rows
///
/// # Layout
///
/// ```text
/// ┌──────────────────────────────┐
/// │        New short link        │
/// │                              │
/// │ ▸ Title: My docs_            │
/// │                              │
/// │   Long URL:                  │
/// │   Long URL is required       │
/// │                              │
/// │   Custom alias (optional):   │
/// │ Creating...                  │
/// └──────────────────────────────┘
/// ```
///
/// Each field line is followed by a line for its validation message. The
/// bottom status line shows the in-flight indicator or the backend rejection
/// (e.g. an alias already in use).
pub fn render_dialog(dialog: &DialogView, theme: &Theme, cols: usize, rows: usize) {
    let box_width = MAX_DIALOG_WIDTH.min(cols.saturating_sub(8));
    let inner_width = box_width.saturating_sub(2);
    let start_col = (cols.saturating_sub(box_width)) / 2 + 1;
    let start_row = (rows.saturating_sub(DIALOG_HEIGHT)) / 2 + 1;
    let border = &theme.colors.dialog_border;

    position_cursor(start_row, start_col);
    print!("{}", Theme::fg(border));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let heading_len = dialog.heading.chars().count();
    let heading_pad = (inner_width.saturating_sub(heading_len)) / 2;
    position_cursor(start_row + 1, start_col);
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{}", " ".repeat(heading_pad));
    print!("{}", dialog.heading);
    print!(
        "{}",
        " ".repeat(inner_width.saturating_sub(heading_pad + heading_len))
    );
    print!("{}", Theme::reset());
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::reset());

    render_interior_line(start_row + 2, start_col, inner_width, border);

    let mut current_row = start_row + 3;
    for field in &dialog.fields {
        let marker = if field.is_focused { "▸ " } else { "  " };
        let cursor = if field.is_focused { "_" } else { "" };
        let content = format!("{}{}: {}{}", marker, field.label, field.value, cursor);
        render_text_line(
            current_row,
            start_col,
            inner_width,
            border,
            &content,
            &theme.colors.text_normal,
            field.is_focused,
        );

        let message = field.error.as_deref().unwrap_or("");
        let message = format!("  {message}");
        render_text_line(
            current_row + 1,
            start_col,
            inner_width,
            border,
            &message,
            &theme.colors.error_fg,
            false,
        );
        current_row += 2;
    }

    let status_row = current_row;
    if dialog.busy {
        render_text_line(
            status_row,
            start_col,
            inner_width,
            border,
            " Creating...",
            &theme.colors.text_dim,
            false,
        );
    } else if let Some(error) = &dialog.error {
        render_text_line(
            status_row,
            start_col,
            inner_width,
            border,
            &format!(" {error}"),
            &theme.colors.error_fg,
            false,
        );
    } else {
        render_interior_line(status_row, start_col, inner_width, border);
    }

    position_cursor(status_row + 1, start_col);
    print!("{}", Theme::fg(border));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());
}

/// Renders one interior dialog line with left-aligned colored text.
fn render_text_line(
    row: usize,
    start_col: usize,
    inner_width: usize,
    border: &str,
    text: &str,
    color: &str,
    bold: bool,
) {
    let shown: String = text.chars().take(inner_width).collect();
    let padding = inner_width.saturating_sub(shown.chars().count());

    position_cursor(row, start_col);
    print!("{}", Theme::fg(border));
    print!("│");
    if bold {
        print!("{}", Theme::bold());
    }
    print!("{}", Theme::fg(color));
    print!("{shown}");
    print!("{}", " ".repeat(padding));
    print!("{}", Theme::reset());
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::reset());
}

/// Renders one blank interior dialog line.
fn render_interior_line(row: usize, start_col: usize, inner_width: usize, border: &str) {
    position_cursor(row, start_col);
    print!("{}", Theme::fg(border));
    print!("│{}│", " ".repeat(inner_width));
    print!("{}", Theme::reset());
}
