//! Header component renderer.
//!
//! Two lines: the centered title, then the focused path with the position
//! indicator right-aligned.

use crate::ui::helpers::{center_padding, width_of};
use crate::ui::viewmodel::HeaderInfo;
use crate::ui::RenderContext;
use crate::views::format::truncate;

/// Renders the header.
///
/// # Layout
///
/// ```text
/// [left padding] TITLE [right padding]
/// _.items[0].name                         3/12 keys
/// ```
///
/// The title is bold in `header_fg` (on `header_bg` when the theme sets one).
/// The path is cut first when the line is too narrow for both.
pub fn render_header(header: &HeaderInfo, ctx: &RenderContext<'_>) -> Vec<String> {
    let colors = ctx.colors();
    let width = ctx.width;

    let title = truncate(&header.title, width);
    let (left, right) = center_padding(width_of(&title), width);
    let mut title_line = format!("{}{}", ctx.bold(), ctx.fg(&colors.header_fg));
    if let Some(bg) = &colors.header_bg {
        title_line.push_str(&ctx.bg(bg));
    }
    title_line.push_str(&format!("{}{title}{}{}", " ".repeat(left), " ".repeat(right), ctx.reset()));

    let position = header.position.as_deref().unwrap_or_default();
    let position = truncate(position, width);
    let path_room = width.saturating_sub(width_of(&position) + usize::from(!position.is_empty()));
    let path = truncate(&header.path, path_room);
    let gap = width.saturating_sub(width_of(&path) + width_of(&position));
    let path_line = format!(
        "{}{}{}",
        ctx.paint(&colors.key_fg, &path),
        " ".repeat(gap),
        ctx.muted(&position)
    );

    vec![title_line, path_line]
}
