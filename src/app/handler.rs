//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place application state changes. It receives
//! key presses, terminal resizes and scheduled events from the host, mutates
//! [`AppState`] and returns the side effects for the host to run.
//!
//! # Key routing
//!
//! 1. The help overlay swallows the next key.
//! 2. With the expression bar open, keys edit the input and drive completion.
//! 3. With a custom view active, help, copy-path and search are handled here
//!    (unless the view is capturing text or consumes search itself) and
//!    everything else goes to the view.
//! 4. Otherwise keys drive the KEY/VALUE table.
//!
//! # Example
//!
//! ```
//! use nestview::app::{handle_event, AppState, Event};
//! use nestview::domain::Key;
//! use nestview::ui::Theme;
//! use serde_json::json;
//!
//! let mut state = AppState::new(json!({"a": {"b": 1}}), Theme::default());
//! let (rerender, actions) = handle_event(&mut state, &Event::Key(Key::Char('l')))?;
//! assert!(rerender && actions.is_empty());
//! assert_eq!(state.current_path, "_.a");
//! # Ok::<(), nestview::domain::NestviewError>(())
//! ```

use crate::app::{Action, AppState, InputMode};
use crate::completion::Accept;
use crate::domain::{Key, LogicalAction, Result};
use crate::path::{display_form, is_complete_path, is_expression, normalized_form, ROOT};
use crate::views::{ActiveView, ViewEvent, ViewKind};

/// Events delivered to the handler by the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press, already translated from the terminal backend.
    Key(Key),

    /// The terminal was resized.
    Resize { width: usize, height: usize },

    /// Timer or completion event for the status view.
    View(ViewEvent),

    /// Clears the application flash set under `generation`.
    FlashClear { generation: u64 },
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns whether a re-render is needed together with the actions, in order.
///
/// # Errors
///
/// Reserved for handler steps that touch fallible resources; key handling,
/// completion and view updates are total.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    if state.quitting {
        tracing::debug!("quit pending, event ignored");
        return Ok((false, vec![]));
    }

    match event {
        Event::Key(key) => Ok(handle_key(state, *key)),
        Event::Resize { width, height } => {
            state.width = *width;
            state.height = *height;
            let resize = ViewEvent::Resize {
                width: *width,
                height: state.body_rows(),
            };
            let mut actions = Vec::new();
            for kind in [ViewKind::List, ViewKind::Detail] {
                actions.extend(state.dispatch_to_view(kind, resize.clone()).unwrap_or_default());
            }
            Ok((true, actions))
        }
        Event::View(view_event) => {
            // only the status view schedules events
            let Some(actions) = state.dispatch_to_view(ViewKind::Status, view_event.clone()) else {
                tracing::debug!("no status view for scheduled event");
                return Ok((false, vec![]));
            };
            Ok((state.view_kind == ViewKind::Status || !actions.is_empty(), actions))
        }
        Event::FlashClear { generation } => Ok((state.clear_flash(*generation), vec![])),
    }
}

fn quit(state: &mut AppState) -> (bool, Vec<Action>) {
    tracing::debug!("quit requested");
    state.quitting = true;
    (false, vec![Action::Quit])
}

fn copy_path(state: &mut AppState) -> Vec<Action> {
    let path = match &state.result {
        Some((expr, _)) => expr.clone(),
        None => display_form(&state.current_path),
    };
    let flash = state.set_flash(format!("Copied {path}"), false);
    vec![Action::Copy(path), flash]
}

fn handle_key(state: &mut AppState, key: Key) -> (bool, Vec<Action>) {
    if state.show_help {
        if key.is_interrupt() {
            return quit(state);
        }
        state.show_help = false;
        return (true, vec![]);
    }

    if state.input_mode == InputMode::Expression {
        return handle_expression_key(state, key);
    }

    let action = state.key_mode.resolve(key);

    let routing = state
        .active_view()
        .filter(|_| state.result.is_none())
        .map(|view| {
            let capturing = match view {
                ActiveView::List(list) => list.is_filtering(),
                ActiveView::Status(_) => true,
                ActiveView::Detail(_) => false,
            };
            (capturing, view.consumes_search())
        });

    if let Some((capturing, consumes_search)) = routing {
        if !capturing {
            match action {
                Some(LogicalAction::Help) => {
                    state.show_help = true;
                    return (true, vec![]);
                }
                Some(LogicalAction::CopyPath) => return (true, copy_path(state)),
                Some(LogicalAction::Search) if !consumes_search => {
                    state.open_expression_bar();
                    return (true, vec![]);
                }
                _ => {}
            }
        }
        let kind = state.view_kind;
        let actions = state.dispatch_to_view(kind, ViewEvent::Key(key)).unwrap_or_default();
        return (true, actions);
    }

    let actions = match action {
        Some(LogicalAction::Up) => {
            state.move_selection_up();
            vec![]
        }
        Some(LogicalAction::Down) => {
            state.move_selection_down();
            vec![]
        }
        Some(LogicalAction::Top) => {
            state.selected_index = 0;
            vec![]
        }
        Some(LogicalAction::Bottom) => {
            state.select_last();
            vec![]
        }
        Some(LogicalAction::Forward | LogicalAction::Enter) => {
            let Some(path) = state.selected_child_path() else {
                return (false, vec![]);
            };
            state.navigate(&path)
        }
        Some(LogicalAction::Back) => state.go_back(),
        Some(LogicalAction::Search) => {
            state.open_expression_bar();
            vec![]
        }
        Some(LogicalAction::CopyPath) => copy_path(state),
        Some(LogicalAction::Help) => {
            state.show_help = true;
            vec![]
        }
        Some(LogicalAction::Quit) => return quit(state),
        None if key == Key::Esc && state.result.is_some() => state.go_back(),
        None => return (false, vec![]),
    };
    (true, actions)
}

fn handle_expression_key(state: &mut AppState, key: Key) -> (bool, Vec<Action>) {
    match key {
        Key::Ctrl('c') => return quit(state),
        Key::Esc => state.close_expression_bar(),
        Key::Enter => return (true, submit_expression(state)),
        Key::Tab | Key::BackTab => {
            let next = if key == Key::Tab {
                state.completion.cycle_forward(&state.root, &state.input)
            } else {
                state.completion.cycle_backward(&state.root, &state.input)
            };
            let Some(text) = next else {
                return (false, vec![]);
            };
            state.cursor = text.chars().count();
            state.input = text;
        }
        Key::Up => state.completion.browse_prev(),
        Key::Down => state.completion.browse_next(),
        Key::End => accept(state),
        Key::Right if state.cursor_at_end() => accept(state),
        Key::Right => state.cursor += 1,
        Key::Left => state.cursor = state.cursor.saturating_sub(1),
        Key::Home => state.cursor = 0,
        Key::Backspace => state.delete_before_cursor(),
        Key::Delete => state.delete_at_cursor(),
        Key::Char(c) => state.insert_char(c),
        _ => return (false, vec![]),
    }
    (true, vec![])
}

fn accept(state: &mut AppState) {
    match state.completion.accept() {
        Accept::Insert(text) => state.set_input(text),
        Accept::MoveToEnd => state.cursor = state.input.chars().count(),
    }
}

/// Enter in the expression bar.
///
/// Complete paths navigate, expressions and literals are evaluated, and an
/// incomplete path (trailing dot, open bracket) keeps the bar open.
fn submit_expression(state: &mut AppState) -> Vec<Action> {
    let input = state.input.trim().to_string();
    if input.is_empty() {
        state.close_expression_bar();
        return vec![];
    }

    let normalized = normalized_form(&input);
    if is_expression(&input) || !normalized.starts_with(ROOT) {
        state.close_expression_bar();
        return state.evaluate(&input);
    }
    if !is_complete_path(&input) {
        tracing::debug!(input = %input, "incomplete path, waiting for more input");
        return vec![];
    }

    state.close_expression_bar();
    state.navigate(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{FunctionCatalog, FunctionEntry};
    use crate::domain::KeyMode;
    use crate::schema::{ListConfig, StatusConfig, ViewSchema};
    use crate::ui::Theme;
    use crate::views::{Phase, FLASH_DURATION};
    use crate::worker::{completion_channel, OperationError};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn data() -> Value {
        json!({
            "pd1001": { "platform": { "os": "linux", "arch": "x86" } },
            "items": [ { "n": 1 }, { "n": 2 }, { "n": 3 } ],
            "name": "demo"
        })
    }

    fn state() -> AppState {
        let catalog = FunctionCatalog::from_entries(vec![
            FunctionEntry {
                name: "has".into(),
                usage: "has(map.field) -> bool".into(),
                description: String::new(),
                applies_to: vec!["any".into()],
            },
            FunctionEntry {
                name: "size".into(),
                usage: "size(value) -> int".into(),
                description: String::new(),
                applies_to: vec!["any".into()],
            },
        ]);
        AppState::new(data(), Theme::default()).with_catalog(catalog).with_color(false)
    }

    fn key(state: &mut AppState, k: Key) -> (bool, Vec<Action>) {
        handle_event(state, &Event::Key(k)).unwrap()
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            key(state, Key::Char(c));
        }
    }

    #[test]
    fn table_navigation_descends_and_returns() {
        let mut s = state();
        key(&mut s, Key::Char('l'));
        assert_eq!(s.current_path, "_.pd1001");
        key(&mut s, Key::Enter);
        assert_eq!(s.current_path, "_.pd1001.platform");
        key(&mut s, Key::Char('h'));
        key(&mut s, Key::Left);
        assert_eq!(s.current_path, ROOT);
    }

    #[test]
    fn tab_cycles_keys_then_functions() {
        let mut s = state();
        key(&mut s, Key::Char('/'));
        assert_eq!(s.input_mode, InputMode::Expression);
        s.set_input("_.pd1001.platform.".into());

        let mut seen = Vec::new();
        for _ in 0..5 {
            key(&mut s, Key::Tab);
            seen.push(s.input.clone());
        }
        assert_eq!(
            seen,
            [
                "_.pd1001.platform.os",
                "_.pd1001.platform.arch",
                "has(_.pd1001.platform)",
                "size(_.pd1001.platform)",
                "_.pd1001.platform.os",
            ]
        );

        key(&mut s, Key::BackTab);
        assert_eq!(s.input, "size(_.pd1001.platform)");
    }

    #[test]
    fn enter_navigates_complete_paths_and_waits_on_incomplete() {
        let mut s = state();
        key(&mut s, Key::Char('/'));
        type_text(&mut s, ".items.");
        key(&mut s, Key::Enter);
        assert_eq!(s.input_mode, InputMode::Expression);

        type_text(&mut s, "1");
        key(&mut s, Key::Enter);
        assert_eq!(s.input_mode, InputMode::Normal);
        assert_eq!(s.current_path, "_.items[1]");
    }

    #[test]
    fn browse_does_not_insert_and_right_accepts_keys_only() {
        let mut s = state();
        key(&mut s, Key::Char('/'));
        type_text(&mut s, ".pd1001.platform.");
        let before = s.input.clone();

        // trailing dot lists functions first
        key(&mut s, Key::Down);
        assert_eq!(s.input, before);
        assert_eq!(s.completion.highlighted(), Some(0));
        key(&mut s, Key::Right);
        assert_eq!(s.input, before);

        key(&mut s, Key::Down);
        key(&mut s, Key::Down);
        key(&mut s, Key::Right);
        assert_eq!(s.input, "_.pd1001.platform.os");
        assert!(s.cursor_at_end());
    }

    #[test]
    fn escape_closes_bar_without_navigating() {
        let mut s = state();
        key(&mut s, Key::Char('/'));
        type_text(&mut s, ".name");
        key(&mut s, Key::Esc);
        assert_eq!(s.input_mode, InputMode::Normal);
        assert_eq!(s.current_path, ROOT);
        assert!(s.input.is_empty());
    }

    #[test]
    fn copy_path_emits_copy_and_flash_clear() {
        let mut s = state();
        s.navigate("_.items[2]");
        let (_, actions) = key(&mut s, Key::Char('y'));
        assert_eq!(
            actions,
            vec![
                Action::Copy("_.items[2]".into()),
                Action::Schedule {
                    after: FLASH_DURATION,
                    event: Event::FlashClear { generation: 1 }
                },
            ]
        );
        let (rerender, _) = handle_event(&mut s, &Event::FlashClear { generation: 1 }).unwrap();
        assert!(rerender);
        assert!(s.flash.is_none());
    }

    #[test]
    fn help_overlay_swallows_next_key() {
        let mut s = state().with_key_mode(KeyMode::Emacs);
        key(&mut s, Key::Alt('h'));
        assert!(s.show_help);
        key(&mut s, Key::Ctrl('x'));
        assert!(!s.show_help);
        assert!(!s.quitting);
        let (_, actions) = key(&mut s, Key::Ctrl('x'));
        assert_eq!(actions, vec![Action::Quit]);
    }

    #[test]
    fn events_after_quit_are_ignored() {
        let mut s = state();
        key(&mut s, Key::Char('q'));
        let (rerender, actions) = key(&mut s, Key::Char('j'));
        assert!(!rerender);
        assert!(actions.is_empty());
    }

    #[test]
    fn list_view_filter_captures_keys() {
        let schema = ViewSchema {
            list: Some(ListConfig {
                title_field: "n".into(),
                subtitle_field: None,
                max_subtitle_lines: 2,
                badge_fields: vec![],
                secondary_fields: vec![],
            }),
            ..ViewSchema::default()
        };
        let mut s = state().with_schema(Some(schema));
        s.navigate("_.items");
        assert_eq!(s.view_kind, ViewKind::List);

        key(&mut s, Key::Char('/'));
        assert_eq!(s.input_mode, InputMode::Normal);
        // 'y' is filter text, not copy-path
        let (_, actions) = key(&mut s, Key::Char('y'));
        assert!(actions.is_empty());
        key(&mut s, Key::Esc);
        key(&mut s, Key::Esc);

        key(&mut s, Key::Char('j'));
        key(&mut s, Key::Enter);
        assert_eq!(s.current_path, "_.items[1]");
        assert_eq!(s.view_kind, ViewKind::Table);
    }

    #[test]
    fn status_flow_through_handler() {
        let schema = ViewSchema {
            status: Some(StatusConfig {
                success_message: Some("Signed in".into()),
                timeout: Some(Duration::from_secs(5)),
                ..StatusConfig::default()
            }),
            ..ViewSchema::default()
        };
        let (tx, rx) = completion_channel();
        let mut s = AppState::new(json!({"code": "XY"}), Theme::default())
            .with_schema(Some(schema))
            .with_operation(rx);

        let actions = s.start(ROOT);
        assert_eq!(s.view_kind, ViewKind::Status);
        assert!(actions.contains(&Action::Schedule {
            after: Duration::from_secs(5),
            event: Event::View(ViewEvent::Timeout)
        }));

        assert!(s.poll_completion().is_none());
        assert!(tx.send(Ok(None)));
        let event = s.poll_completion().unwrap();
        let (_, actions) = handle_event(&mut s, &event).unwrap();
        assert_eq!(s.views.status.as_ref().unwrap().phase(), Phase::Success);
        assert_eq!(s.views.status.as_ref().unwrap().message(), "Signed in");

        let Some(Action::Schedule { event, .. }) = actions.first().cloned() else {
            panic!("expected delayed exit");
        };
        let (_, actions) = handle_event(&mut s, &event).unwrap();
        assert_eq!(actions, vec![Action::Quit]);
        assert!(s.quitting);
    }

    #[test]
    fn timeout_after_queued_error_reports_error() {
        let schema = ViewSchema {
            status: Some(StatusConfig {
                success_message: Some("Signed in".into()),
                timeout: Some(Duration::from_secs(5)),
                ..StatusConfig::default()
            }),
            ..ViewSchema::default()
        };
        let (tx, rx) = completion_channel();
        let mut s = AppState::new(json!({"code": "XY"}), Theme::default())
            .with_schema(Some(schema))
            .with_operation(rx);
        s.start(ROOT);

        assert!(tx.send(Err(OperationError::new("access denied"))));
        handle_event(&mut s, &Event::View(ViewEvent::Timeout)).unwrap();

        let status = s.views.status.as_ref().unwrap();
        assert_eq!(status.phase(), Phase::Error);
        assert_eq!(status.message(), "access denied");
        assert!(s.poll_completion().is_none());
    }
}
