//! Login screen component renderers.
//!
//! This module renders the sign-in form: a tagline, one boxed input per
//! credential field with inline validation messages, and a status area for
//! the in-flight indicator or the backend rejection banner.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BannerInfo, FieldView};

/// Widest the credential boxes get on large terminals.
const MAX_FIELD_BOX_WIDTH: usize = 48;

/// Renders the tagline under the header.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_tagline(row: usize, theme: &Theme, cols: usize) -> usize {
    let text = "Sign in to manage your short links";
    let text_len = text.chars().count();
    let padding = (cols.saturating_sub(text_len)) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(padding));
    print!("{text}");
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the credential input boxes with their validation messages.
///
/// Each field takes four rows: a 3-line box followed by one line for the
/// field's validation message (left blank when the field is valid). The
/// focused field's box uses the accent border color and shows a cursor
/// marker after the value.
///
/// # Parameters
///
/// * `row` - Starting row position for the first field (1-indexed)
/// * `fields` - Field views in display order
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
///
/// # Returns
///
/// The next available row position (row + 4 * number of fields)
pub fn render_login_fields(row: usize, fields: &[FieldView], theme: &Theme, cols: usize) -> usize {
    let box_width = MAX_FIELD_BOX_WIDTH.min(cols.saturating_sub(10));
    let inner_width = box_width.saturating_sub(2);
    let margin = (cols.saturating_sub(box_width)) / 2;

    let mut current_row = row;
    for field in fields {
        current_row = render_field_box(current_row, field, theme, margin, inner_width);

        if let Some(error) = &field.error {
            position_cursor(current_row, 1);
            print!("{}", " ".repeat(margin + 2));
            print!("{}", Theme::fg(&theme.colors.error_fg));
            print!("{error}");
            print!("{}", Theme::reset());
        }
        current_row += 1;
    }
    current_row
}

/// Renders one 3-line credential box.
fn render_field_box(
    row: usize,
    field: &FieldView,
    theme: &Theme,
    margin: usize,
    inner_width: usize,
) -> usize {
    let border_color = if field.is_focused {
        &theme.colors.field_focus_fg
    } else {
        &theme.colors.border
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(margin));
    print!("{}", Theme::fg(border_color));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let cursor = if field.is_focused { "_" } else { "" };
    let content = format!(" {}: {}{}", field.label, field.value, cursor);
    let shown: String = content.chars().take(inner_width).collect();
    let padding = inner_width.saturating_sub(shown.chars().count());

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(margin));
    print!("{}", Theme::fg(border_color));
    print!("│");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{shown}");
    print!("{}", " ".repeat(padding));
    print!("{}", Theme::fg(border_color));
    print!("│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(margin));
    print!("{}", Theme::fg(border_color));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}

/// Renders the sign-in status area below the fields.
///
/// Shows the in-flight indicator while the sign-in request is pending,
/// otherwise the backend rejection banner if one is set.
pub fn render_login_status(
    row: usize,
    banner: Option<&BannerInfo>,
    busy: bool,
    theme: &Theme,
    cols: usize,
) {
    position_cursor(row, 1);

    if busy {
        let text = "Signing in...";
        let padding = (cols.saturating_sub(text.chars().count())) / 2;
        print!("{}", Theme::dim());
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", " ".repeat(padding));
        print!("{text}");
        print!("{}", Theme::reset());
        return;
    }

    if let Some(banner) = banner {
        let color = if banner.is_error {
            &theme.colors.error_fg
        } else {
            &theme.colors.success_fg
        };
        let text: String = banner.text.chars().take(cols).collect();
        let padding = (cols.saturating_sub(text.chars().count())) / 2;
        print!("{}", Theme::fg(color));
        print!("{}", " ".repeat(padding));
        print!("{text}");
        print!("{}", Theme::reset());
    }
}
