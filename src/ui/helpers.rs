//! Shared rendering utilities and helpers.
//!
//! Low-level text helpers used across the components. Everything works on
//! character counts, never byte lengths, and builds strings instead of
//! writing to the terminal.
//!
//! # Example
//!
//! ```
//! use nestview::ui::helpers::{center, highlighted_text};
//! use nestview::ui::{RenderContext, Theme};
//!
//! assert_eq!(center("ab", 6), "  ab  ");
//!
//! let theme = Theme::default();
//! let ctx = RenderContext::new(&theme, 80, 24).with_color(false);
//! assert_eq!(highlighted_text("platform", &[(0, 3)], &ctx, false), "platform");
//! ```

use crate::ui::RenderContext;

/// Visible width of `text` in characters.
#[must_use]
pub fn width_of(text: &str) -> usize {
    text.chars().count()
}

/// `(left, right)` padding that centers `len` characters in `width`.
///
/// If the width cannot be split evenly the extra column goes to the right.
#[must_use]
pub const fn center_padding(len: usize, width: usize) -> (usize, usize) {
    let total = width.saturating_sub(len);
    (total / 2, total - total / 2)
}

/// `text` centered in `width` columns, truncated if it does not fit.
#[must_use]
pub fn center(text: &str, width: usize) -> String {
    let text = crate::views::format::truncate(text, width);
    let (left, right) = center_padding(width_of(&text), width);
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

/// Renders text with highlighted character ranges.
///
/// Ranges are `(start, end)` character indices, end exclusive. When
/// `is_selected` is `true` the highlight is skipped so it does not fight the
/// selection colors.
#[must_use]
pub fn highlighted_text(text: &str, ranges: &[(usize, usize)], ctx: &RenderContext<'_>, is_selected: bool) -> String {
    if ranges.is_empty() || is_selected || !ctx.color {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let highlight = format!(
        "{}{}",
        ctx.fg(&ctx.colors().match_highlight_fg),
        ctx.bg(&ctx.colors().match_highlight_bg)
    );
    let highlight = if highlight.is_empty() { ctx.bold().to_string() } else { highlight };

    let mut out = String::new();
    let mut current_pos = 0;
    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }
        out.extend(&chars[current_pos..start]);
        out.push_str(&highlight);
        out.extend(&chars[start..end]);
        out.push_str(ctx.reset());
        current_pos = end;
    }
    out.extend(&chars[current_pos..]);
    out
}
