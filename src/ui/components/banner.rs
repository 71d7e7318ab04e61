//! Status line component renderer.
//!
//! This module renders the single status line above the bottom border:
//! confirmation and error banners, or a loading note while the link list is
//! being fetched.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::BannerInfo;

/// Renders the status line at the specified row.
///
/// A banner takes precedence over the loading note. With neither present the
/// row is left blank.
///
/// # Parameters
///
/// * `row` - Row position to render the status line (1-indexed)
/// * `banner` - Optional status banner (confirmation or error)
/// * `loading` - Whether a link list fetch is in flight
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
pub fn render_status_line(
    row: usize,
    banner: Option<&BannerInfo>,
    loading: bool,
    theme: &Theme,
    cols: usize,
) {
    position_cursor(row, 1);

    if let Some(banner) = banner {
        let color = if banner.is_error {
            &theme.colors.error_fg
        } else {
            &theme.colors.success_fg
        };
        let text: String = banner.text.chars().take(cols.saturating_sub(1)).collect();
        print!("{}", Theme::fg(color));
        print!(" {text}");
        print!("{}", Theme::reset());
    } else if loading {
        print!("{}", Theme::dim());
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!(" Loading links...");
        print!("{}", Theme::reset());
    }
}
