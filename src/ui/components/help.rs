//! Help overlay listing the bindings of the active key mode.

use crate::ui::RenderContext;
use crate::views::format::{fit, truncate};

pub fn render_help(entries: &[(String, String)], ctx: &RenderContext<'_>) -> Vec<String> {
    let key_width = entries.iter().map(|(keys, _)| keys.chars().count()).max().unwrap_or(0);
    let mut lines = vec![
        format!("{}{}Keys ({}){}", ctx.bold(), ctx.fg(&ctx.colors().header_fg), ctx.key_mode, ctx.reset()),
        String::new(),
    ];
    lines.extend(entries.iter().map(|(keys, description)| {
        let keys = fit(keys, key_width);
        let room = ctx.width.saturating_sub(key_width + 4);
        format!("  {}  {}", ctx.paint(&ctx.colors().key_fg, &keys), truncate(description, room))
    }));
    lines
}
