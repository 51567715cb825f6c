//! Expression bar component renderer.
//!
//! A bordered input box with the cursor, followed by the visible window of
//! the suggestion list.

use crate::ui::helpers::{highlighted_text, width_of};
use crate::ui::viewmodel::{ExpressionBarInfo, SuggestionItem};
use crate::ui::RenderContext;
use crate::views::format::{fit, truncate};

/// Horizontal margin for the input box (spaces on left and right).
const BOX_MARGIN: usize = 2;

/// Cursor drawn when color is off and reverse video is unavailable.
const PLAIN_CURSOR: char = '▏';

/// Renders the expression bar.
///
/// # Layout
///
/// ```text
/// [margin] ┌──────────────────────┐ [margin]
/// [margin] │ Path: _.items[0].na▏ │ [margin]
/// [margin] └──────────────────────┘ [margin]
///   › name      key
///     names     key
///     has       fn()   has(map.field) -> bool
/// ```
///
/// Long input scrolls horizontally so the cursor stays inside the box.
pub fn render_expression_bar(bar: &ExpressionBarInfo, ctx: &RenderContext<'_>) -> Vec<String> {
    let colors = ctx.colors();
    let margin = " ".repeat(BOX_MARGIN);
    let inner_width = ctx.width.saturating_sub(BOX_MARGIN * 2 + 2);

    let label = format!(" {}: ", bar.title);
    let room = inner_width.saturating_sub(width_of(&label) + 1).max(1);
    let chars: Vec<char> = bar.input.chars().collect();
    let cursor = bar.cursor.min(chars.len());
    let start = cursor.saturating_sub(room - 1);
    let end = (start + room).min(chars.len());

    let before: String = chars[start..cursor].iter().collect();
    let (under, after): (String, String) = if cursor < end {
        (chars[cursor].to_string(), chars[cursor + 1..end].iter().collect())
    } else {
        (" ".to_string(), String::new())
    };
    let cursor_cell = if ctx.color {
        format!("{}{under}{}", crate::ui::Theme::reverse(), ctx.reset())
    } else if cursor < end {
        format!("{PLAIN_CURSOR}{under}")
    } else {
        PLAIN_CURSOR.to_string()
    };
    let used = width_of(&label) + width_of(&before) + width_of(&after) + 1 + usize::from(!ctx.color && cursor < end);
    let padding = inner_width.saturating_sub(used);

    let border = ctx.fg(&colors.search_bar_border);
    let text = ctx.fg(&colors.text_normal);
    let reset = ctx.reset();
    let mut lines = vec![
        format!("{margin}{border}┌{}┐{reset}", "─".repeat(inner_width)),
        format!(
            "{margin}{border}│{reset}{text}{label}{before}{cursor_cell}{text}{after}{}{reset}{border}│{reset}",
            " ".repeat(padding)
        ),
        format!("{margin}{border}└{}┘{reset}", "─".repeat(inner_width)),
    ];

    let text_width = bar
        .suggestions
        .iter()
        .map(|s| width_of(&s.text))
        .max()
        .unwrap_or(0)
        .min(ctx.width / 3);
    lines.extend(bar.suggestions.iter().map(|s| render_suggestion(s, text_width, ctx)));
    lines
}

fn render_suggestion(item: &SuggestionItem, text_width: usize, ctx: &RenderContext<'_>) -> String {
    let text = fit(&item.text, text_width);
    let hint_room = ctx.width.saturating_sub(text_width + 14);
    let tail = format!("  {:<6} {}", item.marker, truncate(&item.hint, hint_room));

    if item.is_highlighted {
        return ctx.selected(&fit(&format!("  › {text}{tail}"), ctx.width));
    }
    let matched = item.matched.min(width_of(&text));
    format!("    {}{}", highlighted_text(&text, &[(0, matched)], ctx, false), ctx.muted(&tail))
}
