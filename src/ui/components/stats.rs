//! Stat card band renderer.
//!
//! This module renders the row of boxed stat cards shown between the header
//! and the filter bar: total links created and total clicks across them.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StatCard;

/// Horizontal margin for the stats band (spaces on left and right).
const STATS_MARGIN: usize = 5;

/// Gap between adjacent stat cards.
const CARD_GAP: usize = 2;

/// Renders the stat card band at the specified row.
///
/// Displays each card as a 3-line box, side by side, splitting the available
/// width evenly. The label renders dimmed on the left, the value bold and
/// right-aligned.
///
/// # Parameters
///
/// * `row` - Starting row position for the band (1-indexed)
/// * `stats` - Stat cards to render, left to right
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
///
/// # Returns
///
/// The next available row position (row + 3, since the band uses 3 lines)
///
/// # Layout
///
/// ```text
/// [margin] ┌──────────────┐  ┌──────────────┐ [margin]
/// [margin] │ Links      4 │  │ Clicks   128 │ [margin]
/// [margin] └──────────────┘  └──────────────┘ [margin]
/// ```
pub fn render_stats(row: usize, stats: &[StatCard], theme: &Theme, cols: usize) -> usize {
    if stats.is_empty() {
        return row + 3;
    }

    let band_width = cols.saturating_sub(STATS_MARGIN * 2);
    let gaps = CARD_GAP * (stats.len() - 1);
    let card_width = band_width.saturating_sub(gaps) / stats.len();
    let inner_width = card_width.saturating_sub(2);

    position_cursor(row, 1);
    print!("{}", " ".repeat(STATS_MARGIN));
    print!("{}", Theme::fg(&theme.colors.border));
    for (idx, _) in stats.iter().enumerate() {
        if idx > 0 {
            print!("{}", " ".repeat(CARD_GAP));
        }
        print!("┌{}┐", "─".repeat(inner_width));
    }
    print!("{}", Theme::reset());

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(STATS_MARGIN));
    for (idx, card) in stats.iter().enumerate() {
        if idx > 0 {
            print!("{}", " ".repeat(CARD_GAP));
        }
        let label_len = card.label.chars().count();
        let value_len = card.value.chars().count();
        let padding = inner_width.saturating_sub(label_len + value_len + 2);

        print!("{}", Theme::fg(&theme.colors.border));
        print!("│");
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!(" {}", card.label);
        print!("{}", " ".repeat(padding));
        print!("{}", Theme::bold());
        print!("{}", Theme::fg(&theme.colors.stat_value_fg));
        print!("{} ", card.value);
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.border));
        print!("│");
    }
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(STATS_MARGIN));
    print!("{}", Theme::fg(&theme.colors.border));
    for (idx, _) in stats.iter().enumerate() {
        if idx > 0 {
            print!("{}", " ".repeat(CARD_GAP));
        }
        print!("└{}┘", "─".repeat(inner_width));
    }
    print!("{}", Theme::reset());

    row + 3
}
