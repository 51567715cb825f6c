//! Table component renderer.
//!
//! Renders the focused node's children as a two-column KEY / VALUE table.
//! Values are colored by their node kind; the selected row spans the full
//! width.

use crate::domain::NodeKind;
use crate::ui::viewmodel::TableRow;
use crate::ui::RenderContext;
use crate::views::format::{fit, truncate};

/// Gap between the KEY and VALUE columns.
const COLUMN_GAP: usize = 2;

/// Width of the KEY column: the longest key, capped at a third of the screen.
fn key_width(rows: &[TableRow], width: usize) -> usize {
    rows.iter()
        .map(|row| row.key.chars().count())
        .max()
        .unwrap_or(0)
        .max("KEY".len())
        .min((width / 3).max("KEY".len()))
}

/// Renders the column headings followed by one line per row.
///
/// # Layout
///
/// ```text
/// KEY       VALUE
/// name      "nestview"
/// items     […] 3 items
/// ```
pub fn render_table(rows: &[TableRow], ctx: &RenderContext<'_>) -> Vec<String> {
    let key_width = key_width(rows, ctx.width);
    let value_width = ctx.width.saturating_sub(key_width + COLUMN_GAP);
    let gap = " ".repeat(COLUMN_GAP);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!(
        "{}{}{}{gap}VALUE{}",
        ctx.bold(),
        ctx.fg(&ctx.colors().header_fg),
        fit("KEY", key_width),
        ctx.reset()
    ));

    for row in rows {
        let key = fit(&row.key, key_width);
        let value = truncate(&row.value, value_width);
        if row.is_selected {
            lines.push(ctx.selected(&fit(&format!("{key}{gap}{value}"), ctx.width)));
        } else {
            lines.push(format!(
                "{}{gap}{}",
                ctx.paint(&ctx.colors().key_fg, &key),
                paint_value(&value, row.kind, ctx)
            ));
        }
    }
    lines
}

fn paint_value(value: &str, kind: NodeKind, ctx: &RenderContext<'_>) -> String {
    let colors = ctx.colors();
    match kind {
        NodeKind::Map | NodeKind::Array => ctx.muted(value),
        NodeKind::String => ctx.paint(&colors.string_fg, value),
        NodeKind::Number => ctx.paint(&colors.number_fg, value),
        NodeKind::Bool | NodeKind::Null => ctx.paint(&colors.literal_fg, value),
    }
}
