//! Empty state component renderer.
//!
//! Shown instead of the table when the focused container has no children or
//! the focused path does not resolve.

use crate::ui::helpers::center;
use crate::ui::viewmodel::EmptyState;
use crate::ui::RenderContext;

/// Blank lines above the message.
const TOP_MARGIN: usize = 3;

/// Renders the empty state message.
///
/// # Layout
///
/// ```text
/// [blank lines]
/// [left padding] MESSAGE [right padding]
/// [left padding] subtitle [right padding]
/// ```
///
/// The message uses `empty_state_fg`; the subtitle is dimmed.
pub fn render_empty_state(empty: &EmptyState, ctx: &RenderContext<'_>) -> Vec<String> {
    let margin = TOP_MARGIN.min(ctx.height.saturating_sub(2));
    let mut lines = vec![String::new(); margin];
    lines.push(ctx.paint(&ctx.colors().empty_state_fg, &center(&empty.message, ctx.width)));
    lines.push(ctx.muted(&center(&empty.subtitle, ctx.width)));
    lines
}
