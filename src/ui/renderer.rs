//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to the component renderers
//!
//! The result is a frame of text lines. Writing it to the terminal (cursor
//! positioning, clearing, raw mode) is left to the host loop.
//!
//! # Example
//!
//! ```
//! use nestview::app::AppState;
//! use nestview::ui::{render, Theme};
//! use serde_json::json;
//!
//! let state = AppState::new(json!({"a": 1}), Theme::default()).with_color(false);
//! let frame = render(&state, 24, 80);
//! assert_eq!(frame.lines().count(), 24);
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::viewmodel::UIViewModel;
use crate::ui::RenderContext;

/// Renders the application to a frame of `rows` lines of `cols` columns.
#[must_use]
pub fn render(state: &AppState, rows: usize, cols: usize) -> String {
    let _span = tracing::trace_span!("render", rows, cols).entered();
    let viewmodel = state.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, &state.render_context(cols, rows))
}

/// Renders a pre-computed view model; lines are joined with `\n`.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, ctx: &RenderContext<'_>) -> String {
    components::render_frame(vm, ctx).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{handle_event, Event};
    use crate::domain::Key;
    use crate::ui::Theme;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(
            json!({"name": "demo", "items": [{"id": 1}, {"id": 2}]}),
            Theme::default(),
        )
        .with_color(false)
    }

    #[test]
    fn frame_fills_the_screen() {
        let frame = render(&state(), 12, 40);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0].trim(), "nestview");
        assert_eq!(lines[1], format!("_{}1/2 keys", " ".repeat(31)));
        assert_eq!(lines[3].trim_end(), "KEY    VALUE");
        assert!(lines[4].starts_with("name   \"demo\""));
        assert!(lines[11].contains("move"));
    }

    #[test]
    fn expression_bar_pushes_body_down() {
        let mut s = state();
        handle_event(&mut s, &Event::Key(Key::Char('/'))).unwrap();
        let frame = render(&s, 16, 40);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 16);
        assert!(lines[4].contains("Path: _▏"));
        assert!(frame.contains("KEY"));
    }

    #[test]
    fn flash_sits_above_the_footer() {
        let mut s = state();
        handle_event(&mut s, &Event::Key(Key::Char('y'))).unwrap();
        let frame = render(&s, 12, 40);
        let lines: Vec<&str> = frame.lines().collect();
        assert!(lines[9].contains("Copied _"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let frame = render(&state(), 2, 3);
        assert_eq!(frame.lines().count(), 2);
    }
}
