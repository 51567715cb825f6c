//! Composable UI component renderers.
//!
//! Each component renders one part of the screen into lines of text; the
//! frame function stacks them in order. Components never write to the
//! terminal themselves.
//!
//! # Components
//!
//! - [`header`]: Title and focused path with position indicator
//! - [`expression`]: Expression bar with the suggestion list
//! - [`table`]: KEY / VALUE table of the focused node's children
//! - [`empty`]: Empty state message
//! - [`help`]: Keybinding overlay
//! - [`footer`]: Flash line and keybinding hints
//!
//! # Layout
//!
//! ```text
//! [Header - 2 lines]
//! [Border]
//! [Expression Bar - 3 lines + suggestions, while open]
//! [Body: table, custom view, empty state or help]
//! [Blank padding to fill screen]
//! [Flash]
//! [Border]
//! [Footer]
//! ```

mod empty;
mod expression;
mod footer;
mod header;
mod help;
mod table;

pub use empty::render_empty_state;
pub use expression::render_expression_bar;
pub use footer::{render_flash, render_footer};
pub use header::render_header;
pub use help::render_help;
pub use table::render_table;

use crate::ui::viewmodel::{Body, UIViewModel};
use crate::ui::RenderContext;

/// Lines below the body: flash, border and footer.
const BOTTOM_ROWS: usize = 3;

/// Renders a horizontal border line, used to separate UI sections.
#[must_use]
pub fn render_border(ctx: &RenderContext<'_>) -> String {
    ctx.paint(&ctx.colors().border, &"─".repeat(ctx.width))
}

/// Renders the body into at most `ctx.height` lines.
#[must_use]
pub fn render_body(body: &Body, ctx: &RenderContext<'_>) -> Vec<String> {
    match body {
        Body::Table(rows) => render_table(rows, ctx),
        Body::Custom(text) => text.lines().map(str::to_string).collect(),
        Body::Empty(empty) => render_empty_state(empty, ctx),
        Body::Help(entries) => render_help(entries, ctx),
    }
}

/// Renders a complete frame of exactly `ctx.height` lines.
///
/// The body is cut or padded so the flash, border and footer always sit on
/// the last three rows.
#[must_use]
pub fn render_frame(vm: &UIViewModel, ctx: &RenderContext<'_>) -> Vec<String> {
    let mut lines = render_header(&vm.header, ctx);
    lines.push(render_border(ctx));
    if let Some(bar) = &vm.expression_bar {
        lines.extend(render_expression_bar(bar, ctx));
    }

    let body_rows = ctx.height.saturating_sub(lines.len() + BOTTOM_ROWS);
    let mut body = render_body(&vm.body, &ctx.with_size(ctx.width, body_rows));
    body.resize(body_rows, String::new());
    lines.extend(body);

    lines.push(render_flash(vm.flash.as_ref(), ctx));
    lines.push(render_border(ctx));
    lines.push(render_footer(&vm.footer, ctx));
    lines.truncate(ctx.height);
    lines
}
