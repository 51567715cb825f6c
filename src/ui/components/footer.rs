//! Footer component renderer: keybinding hints and the flash line above them.

use crate::ui::helpers::center;
use crate::ui::viewmodel::FooterInfo;
use crate::ui::RenderContext;
use crate::views::format::fit;
use crate::views::Flash;

/// Renders the footer help line.
///
/// Keybinding hints are centered and dimmed. Text wider than the terminal
/// is truncated so narrow terminals keep their layout.
pub fn render_footer(footer: &FooterInfo, ctx: &RenderContext<'_>) -> String {
    ctx.muted(&center(&footer.keybindings, ctx.width))
}

/// Renders the flash line; blank when there is no flash.
pub fn render_flash(flash: Option<&Flash>, ctx: &RenderContext<'_>) -> String {
    let Some(flash) = flash else {
        return String::new();
    };
    let color = if flash.is_error {
        &ctx.colors().error_fg
    } else {
        &ctx.colors().success_fg
    };
    let marker = if flash.is_error { "✗" } else { "✓" };
    ctx.paint(color, &fit(&format!(" {marker} {}", flash.text), ctx.width))
}
