//! Shared rendering utilities and helpers.
//!
//! This module provides low-level rendering utilities used across multiple UI
//! components: cursor positioning and filter-match highlighting with proper
//! ANSI escape sequence management.
//!
//! # Example
//!
//! ```rust
//! use linkdeck::ui::helpers::render_highlighted_text;
//! use linkdeck::ui::Theme;
//!
//! let theme = Theme::default();
//! let text = "My Blog";
//! let ranges = vec![(3, 7)]; // Highlight "Blog"
//!
//! render_highlighted_text(text, &ranges, &theme, false);
//! ```

use crate::ui::theme::Theme;

/// Positions the cursor at a specific row and column.
///
/// Uses ANSI escape sequence `\u{1b}[{row};{col}H` to move the cursor.
/// Coordinates are 1-indexed (row 1 = first row, col 1 = first column).
///
/// # Example
///
/// ```rust
/// use linkdeck::ui::helpers::position_cursor;
///
/// position_cursor(5, 1); // Move to start of row 5
/// print!("Content at row 5");
/// ```
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Renders text with highlighted character ranges for filter matches.
///
/// Splits the text into highlighted and normal sections based on the provided
/// character ranges. On the selected row highlighting is suppressed entirely
/// so it never fights with the selection background.
///
/// # Parameters
///
/// * `text` - The text to render
/// * `ranges` - Character index ranges to highlight `(start, end)` (inclusive start, exclusive end)
/// * `theme` - Active color theme for highlight colors
/// * `is_selected` - Whether the row is currently selected
///
/// # Character Indices
///
/// Ranges use character indices (not byte indices). The function converts the
/// text to a character vector so multibyte titles index correctly.
///
/// # Styling
///
/// After a highlight range the normal text color is re-applied, so the caller
/// can keep printing the rest of the row in the same style. The caller owns
/// the final reset.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end.min(chars.len())].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
