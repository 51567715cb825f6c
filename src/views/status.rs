//! Status view: tracks one external operation through its phases.
//!
//! The view starts [`Phase::Waiting`] and resolves exactly once, either from
//! the completion channel or from the configured timeout. Everything time
//! related (spinner ticks, the timeout, flash clearing, delayed exit) arrives
//! as a scheduled [`ViewEvent`]; the view never reads a clock.
//!
//! Once a quit has been requested every later event is ignored, so a
//! completion that lands after the user pressed quit changes nothing.

use super::format::field_text;
use super::{Flash, Position, ViewCommand, ViewEvent, FLASH_DURATION};
use crate::domain::{Key, KeyMode, LogicalAction};
use crate::schema::{ActionType, DoneBehavior, StatusConfig, ViewSchema};
use crate::ui::RenderContext;
use crate::worker::{CompletionReceiver, OperationOutcome};
use serde_json::Value;
use std::time::Duration;

/// Spinner and elapsed-time resolution.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const DEFAULT_WAIT_MESSAGE: &str = "Working…";
const DEFAULT_SUCCESS_MESSAGE: &str = "Done";

/// Lifecycle of the operation a status view reports on.
///
/// Starts in `Waiting` and moves to one of the terminal phases exactly once;
/// later completions and timeouts are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Operation running; the spinner ticks.
    #[default]
    Waiting,
    /// Operation succeeded or the timeout elapsed without an outcome.
    Success,
    /// Operation reported a failure or its producer went away.
    Error,
}

impl Phase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Waiting)
    }
}

/// Progress page for a node whose value is the subject of a background
/// operation, such as a login code shown while the login completes.
#[derive(Debug)]
pub struct StatusView {
    title: String,
    config: StatusConfig,
    /// Label and resolved value for each display field present in the node.
    fields: Vec<(String, String)>,
    /// Action label, kind, key for the current mode and target value.
    actions: Vec<(String, ActionType, Option<Key>, Option<String>)>,
    phase: Phase,
    message: String,
    receiver: Option<CompletionReceiver>,
    quitting: bool,
    spinner: usize,
    elapsed: Duration,
    flash: Option<Flash>,
    flash_generation: u64,
    key_mode: KeyMode,
}

impl StatusView {
    #[must_use]
    pub fn new(
        schema: &ViewSchema,
        config: &StatusConfig,
        node: &Value,
        key_mode: KeyMode,
        completion: Option<CompletionReceiver>,
    ) -> Self {
        let base_title = config
            .title_field
            .as_deref()
            .and_then(|f| field_text(node, f))
            .or_else(|| schema.title.clone())
            .unwrap_or_else(|| "Status".to_string());
        let title = match &schema.icon {
            Some(icon) => format!("{icon} {base_title}"),
            None => base_title,
        };

        let message = config
            .message_field
            .as_deref()
            .and_then(|f| field_text(node, f))
            .or_else(|| config.wait_message.clone())
            .unwrap_or_else(|| DEFAULT_WAIT_MESSAGE.to_string());

        let fields = config
            .fields
            .iter()
            .filter_map(|f| field_text(node, &f.field).map(|v| (f.label.clone(), v)))
            .collect();

        let actions = config
            .actions
            .iter()
            .map(|a| (a.label.clone(), a.kind, a.keys.key_for(key_mode), field_text(node, &a.field)))
            .collect();

        tracing::debug!(title = %title, has_completion = completion.is_some(), "status view created");

        Self {
            title,
            config: config.clone(),
            fields,
            actions,
            phase: Phase::Waiting,
            message,
            receiver: completion,
            quitting: false,
            spinner: 0,
            elapsed: Duration::ZERO,
            flash: None,
            flash_generation: 0,
            key_mode,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn is_quitting(&self) -> bool {
        self.quitting
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.clone()
    }

    #[must_use]
    pub fn footer(&self) -> String {
        if self.phase.is_terminal() && self.config.done_behavior == DoneBehavior::WaitForKey {
            return "any key: exit".to_string();
        }
        let mut parts: Vec<String> = self
            .actions
            .iter()
            .filter_map(|(label, _, key, _)| key.map(|k| format!("{k}: {}", label.to_lowercase())))
            .collect();
        parts.push(format!("{}/esc: quit", self.key_mode.binding(LogicalAction::Quit)));
        parts.join("  ")
    }

    /// Ticks, plus the timeout when one is configured.
    #[must_use]
    pub fn init_command(&self) -> Option<ViewCommand> {
        if self.phase.is_terminal() || self.quitting {
            return None;
        }
        ViewCommand::batch([
            Some(ViewCommand::Schedule {
                after: TICK_INTERVAL,
                event: ViewEvent::Tick,
            }),
            self.config.timeout.map(|after| ViewCommand::Schedule {
                after,
                event: ViewEvent::Timeout,
            }),
        ])
    }

    #[must_use]
    pub const fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    #[must_use]
    pub fn position(&self) -> Position {
        let count = self.fields.len();
        (count, usize::from(count > 0), "fields".to_string())
    }

    /// Non-blocking check of the completion channel.
    ///
    /// Returns the event to feed back into [`update`](Self::update); `None`
    /// while the operation is still running or once the view has resolved.
    pub fn poll_completion(&mut self) -> Option<ViewEvent> {
        if self.quitting || self.phase.is_terminal() {
            return None;
        }
        self.receiver.as_ref()?.try_take().map(ViewEvent::Completion)
    }

    fn finish(&mut self, phase: Phase, message: String) -> Option<ViewCommand> {
        tracing::debug!(?phase, message = %message, "status resolved");
        self.phase = phase;
        self.message = message;
        self.receiver = None;
        match self.config.done_behavior {
            DoneBehavior::ExitAfterDelay => Some(ViewCommand::Schedule {
                after: self.config.delay,
                event: ViewEvent::DoneExit,
            }),
            DoneBehavior::WaitForKey => None,
        }
    }

    fn success_message(&self) -> String {
        self.config
            .success_message
            .clone()
            .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string())
    }

    fn complete(&mut self, outcome: OperationOutcome) -> Option<ViewCommand> {
        match outcome {
            Ok(message) => {
                let message = message.filter(|m| !m.is_empty()).unwrap_or_else(|| self.success_message());
                self.finish(Phase::Success, message)
            }
            Err(error) => self.finish(Phase::Error, error.message),
        }
    }

    fn quit(&mut self) -> Option<ViewCommand> {
        self.quitting = true;
        self.receiver = None;
        Some(ViewCommand::Quit)
    }

    fn set_flash(&mut self, text: String, is_error: bool) -> ViewCommand {
        self.flash_generation += 1;
        self.flash = Some(Flash { text, is_error });
        ViewCommand::Schedule {
            after: FLASH_DURATION,
            event: ViewEvent::FlashClear {
                generation: self.flash_generation,
            },
        }
    }

    fn run_action(&mut self, index: usize) -> Option<ViewCommand> {
        let (label, kind, _, value) = self.actions.get(index)?.clone();
        let Some(value) = value else {
            return Some(self.set_flash(format!("{label}: no value"), true));
        };
        let (command, text) = match kind {
            ActionType::CopyValue => (ViewCommand::Copy(value.clone()), format!("Copied {value}")),
            ActionType::OpenUrl => (ViewCommand::OpenUrl(value.clone()), format!("Opened {value}")),
        };
        let clear = self.set_flash(text, false);
        Some(ViewCommand::Batch(vec![command, clear]))
    }

    fn handle_key(&mut self, key: Key) -> Option<ViewCommand> {
        if matches!(key, Key::Ctrl('c') | Key::Esc) || self.key_mode.is_quit(key) {
            return self.quit();
        }
        if self.phase.is_terminal() && self.config.done_behavior == DoneBehavior::WaitForKey {
            return self.quit();
        }
        let index = self.actions.iter().position(|(_, _, k, _)| *k == Some(key))?;
        self.run_action(index)
    }

    #[must_use]
    pub fn update(mut self, event: ViewEvent) -> (Self, Option<ViewCommand>) {
        if self.quitting {
            return (self, None);
        }

        let command = match event {
            ViewEvent::Key(key) => self.handle_key(key),
            ViewEvent::Tick if self.phase == Phase::Waiting => {
                self.spinner = (self.spinner + 1) % SPINNER.len();
                self.elapsed += TICK_INTERVAL;
                Some(ViewCommand::Schedule {
                    after: TICK_INTERVAL,
                    event: ViewEvent::Tick,
                })
            }
            ViewEvent::Timeout if self.phase == Phase::Waiting && self.config.timeout.is_some() => {
                // an outcome already sitting in the channel wins over the deadline
                match self.receiver.as_ref().and_then(CompletionReceiver::try_take) {
                    Some(outcome) => self.complete(outcome),
                    None => {
                        let message = self.success_message();
                        self.finish(Phase::Success, message)
                    }
                }
            }
            ViewEvent::Completion(outcome) if self.phase == Phase::Waiting => self.complete(outcome),
            ViewEvent::FlashClear { generation } => {
                if generation == self.flash_generation {
                    self.flash = None;
                }
                None
            }
            ViewEvent::DoneExit if self.phase.is_terminal() => self.quit(),
            _ => None,
        };
        (self, command)
    }

    #[must_use]
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let colors = ctx.colors();
        let mut lines = Vec::new();

        let (marker, color) = match self.phase {
            Phase::Waiting => (SPINNER[self.spinner], &colors.pending_fg),
            Phase::Success => ("✓", &colors.success_fg),
            Phase::Error => ("✗", &colors.error_fg),
        };
        lines.push(format!("{} {}{}{}", ctx.paint(color, marker), ctx.bold(), self.message, ctx.reset()));
        if self.phase == Phase::Waiting {
            lines.push(ctx.muted(&format!("  waiting {:.1}s", self.elapsed.as_secs_f64())));
        }

        if !self.fields.is_empty() {
            lines.push(String::new());
            for (label, value) in &self.fields {
                lines.push(format!("  {}: {value}", ctx.paint(&colors.key_fg, label)));
            }
        }

        let bound: Vec<String> = self
            .actions
            .iter()
            .filter_map(|(label, _, key, _)| key.map(|k| format!("  [{k}] {label}")))
            .collect();
        if !bound.is_empty() {
            lines.push(String::new());
            lines.extend(bound);
        }

        if self.phase.is_terminal() && self.config.done_behavior == DoneBehavior::WaitForKey {
            lines.push(String::new());
            lines.push(ctx.muted("Press any key to exit"));
        }

        if let Some(flash) = &self.flash {
            let color = if flash.is_error { &colors.error_fg } else { &colors.success_fg };
            lines.push(String::new());
            lines.push(ctx.paint(color, &flash.text));
        }

        lines.truncate(ctx.height.max(1));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ActionKeys, DisplayField, StatusAction};
    use crate::worker::{completion_channel, OperationError};
    use serde_json::json;

    fn node() -> Value {
        json!({"code": "ABCD-1234", "url": "https://example.com/device", "prompt": "Enter the code"})
    }

    fn config() -> StatusConfig {
        StatusConfig {
            message_field: Some("prompt".into()),
            success_message: Some("Logged in".into()),
            timeout: Some(Duration::from_secs(30)),
            fields: vec![DisplayField {
                label: "Code".into(),
                field: "code".into(),
            }],
            actions: vec![StatusAction {
                label: "Copy code".into(),
                kind: ActionType::CopyValue,
                field: "code".into(),
                keys: ActionKeys {
                    vim: Some("c".into()),
                    emacs: Some("alt+c".into()),
                    function: Some("f12".into()),
                },
            }],
            ..StatusConfig::default()
        }
    }

    fn view(config: &StatusConfig, receiver: Option<CompletionReceiver>) -> StatusView {
        StatusView::new(&ViewSchema::default(), config, &node(), KeyMode::Vim, receiver)
    }

    #[test]
    fn completion_success_uses_result_message() {
        let (tx, rx) = completion_channel();
        let mut v = view(&config(), Some(rx));
        assert!(v.poll_completion().is_none());

        assert!(tx.send(Ok(Some("Welcome back".into()))));
        let event = v.poll_completion().unwrap();
        let (v, cmd) = v.update(event);
        assert_eq!(v.phase(), Phase::Success);
        assert_eq!(v.message(), "Welcome back");
        assert_eq!(
            cmd,
            Some(ViewCommand::Schedule {
                after: Duration::from_millis(1500),
                event: ViewEvent::DoneExit
            })
        );
        let (v, cmd) = v.update(ViewEvent::DoneExit);
        assert_eq!(cmd, Some(ViewCommand::Quit));
        assert!(v.is_quitting());
    }

    #[test]
    fn empty_result_falls_back_to_success_message() {
        let (v, _) = view(&config(), None).update(ViewEvent::Completion(Ok(None)));
        assert_eq!(v.message(), "Logged in");
    }

    #[test]
    fn error_completion_sets_error_phase() {
        let (v, _) = view(&config(), None).update(ViewEvent::Completion(Err(OperationError::new("denied"))));
        assert_eq!(v.phase(), Phase::Error);
        assert_eq!(v.message(), "denied");
    }

    #[test]
    fn timeout_uses_fallback_message() {
        let (v, _) = view(&config(), None).update(ViewEvent::Timeout);
        assert_eq!(v.phase(), Phase::Success);
        assert_eq!(v.message(), "Logged in");

        let mut no_message = config();
        no_message.success_message = None;
        let (v, _) = view(&no_message, None).update(ViewEvent::Timeout);
        assert_eq!(v.message(), "Done");
    }

    #[test]
    fn resolution_happens_once() {
        let (v, _) = view(&config(), None).update(ViewEvent::Completion(Err(OperationError::new("boom"))));
        let (v, cmd) = v.update(ViewEvent::Timeout);
        assert_eq!(cmd, None);
        let (v, _) = v.update(ViewEvent::Completion(Ok(Some("late".into()))));
        assert_eq!(v.phase(), Phase::Error);
        assert_eq!(v.message(), "boom");
    }

    #[test]
    fn tick_reschedules_only_while_waiting() {
        let v = view(&config(), None);
        let (v, cmd) = v.update(ViewEvent::Tick);
        assert!(matches!(cmd, Some(ViewCommand::Schedule { event: ViewEvent::Tick, .. })));
        assert_eq!(v.elapsed(), TICK_INTERVAL);

        let (v, _) = v.update(ViewEvent::Completion(Ok(None)));
        let (v, cmd) = v.update(ViewEvent::Tick);
        assert_eq!(cmd, None);
        assert_eq!(v.elapsed(), TICK_INTERVAL);
    }

    #[test]
    fn init_schedules_tick_and_timeout() {
        let cmd = view(&config(), None).init_command().unwrap();
        assert_eq!(
            cmd.flatten(),
            vec![
                ViewCommand::Schedule {
                    after: TICK_INTERVAL,
                    event: ViewEvent::Tick
                },
                ViewCommand::Schedule {
                    after: Duration::from_secs(30),
                    event: ViewEvent::Timeout
                },
            ]
        );
    }

    #[test]
    fn quit_preempts_later_completion() {
        let (tx, rx) = completion_channel();
        let v = view(&config(), Some(rx));
        let (mut v, cmd) = v.update(ViewEvent::Key(Key::Char('q')));
        assert_eq!(cmd, Some(ViewCommand::Quit));

        let _ = tx.send(Ok(Some("too late".into())));
        assert!(v.poll_completion().is_none());
        let (v, cmd) = v.update(ViewEvent::Completion(Ok(Some("too late".into()))));
        assert_eq!(cmd, None);
        assert_eq!(v.phase(), Phase::Waiting);
    }

    #[test]
    fn interrupt_and_escape_quit_in_any_phase() {
        for key in [Key::Ctrl('c'), Key::Esc] {
            let (_, cmd) = view(&config(), None).update(ViewEvent::Key(key));
            assert_eq!(cmd, Some(ViewCommand::Quit));
        }
    }

    #[test]
    fn any_key_quits_when_waiting_for_key() {
        let mut cfg = config();
        cfg.done_behavior = DoneBehavior::WaitForKey;
        let v = view(&cfg, None);

        // before resolution ordinary keys do nothing
        let (v, cmd) = v.update(ViewEvent::Key(Key::Char('x')));
        assert_eq!(cmd, None);

        let (v, cmd) = v.update(ViewEvent::Completion(Ok(None)));
        assert_eq!(cmd, None);
        assert!(v.footer().contains("any key"));
        let (_, cmd) = v.update(ViewEvent::Key(Key::Char('x')));
        assert_eq!(cmd, Some(ViewCommand::Quit));
    }

    #[test]
    fn stale_flash_clear_is_ignored() {
        let v = view(&config(), None);
        let (v, first) = v.update(ViewEvent::Key(Key::Char('c')));
        assert_eq!(
            first.unwrap().flatten(),
            vec![
                ViewCommand::Copy("ABCD-1234".into()),
                ViewCommand::Schedule {
                    after: FLASH_DURATION,
                    event: ViewEvent::FlashClear { generation: 1 }
                },
            ]
        );
        let (v, _) = v.update(ViewEvent::Key(Key::Char('c')));
        assert_eq!(v.flash().unwrap().text, "Copied ABCD-1234");

        let (v, _) = v.update(ViewEvent::FlashClear { generation: 1 });
        assert!(v.flash().is_some());
        let (v, _) = v.update(ViewEvent::FlashClear { generation: 2 });
        assert!(v.flash().is_none());
    }

    #[test]
    fn disconnected_producer_becomes_error() {
        let (tx, rx) = completion_channel();
        let mut v = view(&config(), Some(rx));
        drop(tx);
        let event = v.poll_completion().unwrap();
        let (v, _) = v.update(event);
        assert_eq!(v.phase(), Phase::Error);
        assert_eq!(v.message(), "operation ended without a result");
    }

    #[test]
    fn timeout_resolves_from_outcome_already_sent() {
        let (tx, rx) = completion_channel();
        let v = view(&config(), Some(rx));
        assert!(tx.send(Err(OperationError::new("access denied"))));

        let (mut v, _) = v.update(ViewEvent::Timeout);
        assert_eq!(v.phase(), Phase::Error);
        assert_eq!(v.message(), "access denied");
        assert!(v.poll_completion().is_none());
    }

    #[test]
    fn timeout_with_running_producer_uses_fallback() {
        let (tx, rx) = completion_channel();
        let (v, _) = view(&config(), Some(rx)).update(ViewEvent::Timeout);
        assert_eq!(v.phase(), Phase::Success);
        assert_eq!(v.message(), "Logged in");
        assert!(!tx.send(Ok(Some("late".into()))));
    }

    #[test]
    fn renders_fields_and_actions() {
        let theme = crate::ui::Theme::default();
        let ctx = RenderContext::new(&theme, 60, 20).with_color(false);
        let out = view(&config(), None).render(&ctx);
        assert!(out.starts_with("⠋ Enter the code\n  waiting 0.0s"));
        assert!(out.contains("  Code: ABCD-1234"));
        assert!(out.contains("  [c] Copy code"));
    }
}
