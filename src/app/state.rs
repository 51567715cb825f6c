//! Application state management and view model computation.
//!
//! [`AppState`] is the single source of truth for everything the browser
//! shows: the document, the focused path, the table selection, the
//! expression bar with its completion engine, the custom view states and the
//! transient flash. It is mutated only by the event handler; view models are
//! computed on demand from a state snapshot.
//!
//! # Example
//!
//! ```
//! use nestview::app::AppState;
//! use nestview::ui::Theme;
//! use serde_json::json;
//!
//! let mut state = AppState::new(json!({"items": [1, 2]}), Theme::default());
//! state.navigate("_.items");
//! assert_eq!(state.current_path, "_.items");
//! let vm = state.compute_viewmodel(24, 80);
//! assert_eq!(vm.header.path, "_.items");
//! ```

use super::actions::Action;
use super::handler::Event;
use super::modes::InputMode;
use crate::completion::{split_input, CompletionEngine, FunctionCatalog};
use crate::domain::{resolve, Evaluator, KeyMode, LogicalAction, NodeKind, PathEvaluator};
use crate::path::{build_child_path, build_index_path, display_form, normalized_form, strip_last_segment, ROOT};
use crate::schema::ViewSchema;
use crate::ui::viewmodel::{
    Body, EmptyState, ExpressionBarInfo, FooterInfo, HeaderInfo, SuggestionItem, TableRow, UIViewModel,
};
use crate::ui::{RenderContext, Theme};
use crate::views::{
    self, format, resolve_active_view, ActiveView, Flash, ViewCommand, ViewEvent, ViewKind, ViewStates,
    FLASH_DURATION,
};
use crate::worker::CompletionReceiver;
use serde_json::Value;

/// Rows taken by header (2), borders (2), flash line and footer.
const CHROME_ROWS: usize = 6;

/// Rows taken by the expression bar frame.
const EXPRESSION_BAR_ROWS: usize = 3;

/// Suggestions shown below the expression bar at once.
const MAX_SUGGESTIONS: usize = 6;

/// Central application state container.
///
/// Holds the document, the focus, the expression bar and every custom view
/// slot. Mutated only by the event handler in response to key, resize, timer
/// and completion events. View models are computed on demand from state
/// snapshots.
#[derive(Debug)]
pub struct AppState {
    /// Document being browsed.
    ///
    /// Never mutated after construction; every path resolves against it.
    pub root: Value,

    /// Normalized path of the focused node.
    ///
    /// Always starts with `_`. Changed only by `navigate()`, which refuses
    /// paths that do not resolve, so this always names an existing node.
    pub current_path: String,

    /// Zero-based selected row of the KEY/VALUE table.
    ///
    /// Reset to zero on every navigation. Wraps around during
    /// `move_selection_up/down()`.
    pub selected_index: usize,

    /// Current input handling mode.
    ///
    /// `Expression` while the path bar is open; keys then edit the input
    /// instead of driving the table or a custom view.
    pub input_mode: InputMode,

    /// Expression bar text.
    ///
    /// Prefilled with the display form of the focus when the bar opens and
    /// cleared when it closes.
    pub input: String,

    /// Cursor position in `input`, counted in characters.
    pub cursor: usize,

    /// Suggestions, browse highlight and Tab cycle for the expression bar.
    ///
    /// Refreshed on every edit; Tab cycling deliberately bypasses the
    /// refresh so consecutive presses continue one cycle.
    pub completion: CompletionEngine,

    /// Custom view definitions, or `None` for plain table browsing.
    pub schema: Option<ViewSchema>,

    /// Which presentation is active; paired with `views` by the resolver.
    pub view_kind: ViewKind,

    /// Per-kind custom view slots.
    ///
    /// Only the slot matching `view_kind` is rendered. List and detail slots
    /// are dropped on navigation; the status slot outlives it.
    pub views: ViewStates,

    /// Path the current status view was built for.
    status_path: Option<String>,

    /// Completion receiver waiting for the first status view.
    pending_completion: Option<CompletionReceiver>,

    /// Expression text and value of the last evaluation, shown instead of
    /// the focused node until the next navigation.
    pub result: Option<(String, Value)>,

    /// Transient notification shown above the footer.
    ///
    /// Cleared by a `FlashClear` event carrying the matching generation.
    pub flash: Option<Flash>,
    flash_generation: u64,

    /// Help overlay is up; the next key closes it.
    pub show_help: bool,

    /// Key binding scheme for the table and the custom views.
    pub key_mode: KeyMode,

    /// Color scheme for UI rendering.
    ///
    /// Passed to every render call through [`RenderContext`].
    pub theme: Theme,

    /// Emit ANSI color. `false` under `--no-color` or `NO_COLOR`.
    pub color: bool,

    /// Last known terminal size.
    pub width: usize,
    pub height: usize,

    /// Set once a quit was requested.
    ///
    /// The handler ignores every later event, including a completion that
    /// arrives afterwards.
    pub quitting: bool,

    evaluator: Box<dyn Evaluator>,
}

impl AppState {
    /// Creates a state focused on the document root.
    #[must_use]
    pub fn new(root: Value, theme: Theme) -> Self {
        Self {
            root,
            current_path: ROOT.to_string(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            input: String::new(),
            cursor: 0,
            completion: CompletionEngine::new(FunctionCatalog::empty()),
            schema: None,
            view_kind: ViewKind::Table,
            views: ViewStates::default(),
            status_path: None,
            pending_completion: None,
            result: None,
            flash: None,
            flash_generation: 0,
            show_help: false,
            key_mode: KeyMode::default(),
            theme,
            color: true,
            width: 80,
            height: 24,
            quitting: false,
            evaluator: Box::new(PathEvaluator),
        }
    }

    /// Sets the custom view definitions.
    #[must_use]
    pub fn with_schema(mut self, schema: Option<ViewSchema>) -> Self {
        self.schema = schema;
        self
    }

    /// Sets the key binding scheme.
    #[must_use]
    pub const fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    /// Enables or disables ANSI color output.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Sets the initial terminal size, before the first resize event.
    #[must_use]
    pub const fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Replaces the function catalog used for completion.
    #[must_use]
    pub fn with_catalog(mut self, catalog: FunctionCatalog) -> Self {
        self.completion = CompletionEngine::new(catalog);
        self
    }

    /// Hands an external operation to the first status view that is shown.
    #[must_use]
    pub fn with_operation(mut self, receiver: CompletionReceiver) -> Self {
        self.pending_completion = Some(receiver);
        self
    }

    /// Replaces the evaluator used for non-path expressions.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Focuses `path` and returns the start-up actions of the view it gets.
    ///
    /// A path that does not resolve falls back to the root and flashes an
    /// error instead of failing.
    pub fn start(&mut self, path: &str) -> Vec<Action> {
        tracing::debug!(path, "starting");
        let mut actions = Vec::new();
        let target = if resolve(&self.root, &normalized_form(path)).is_some() {
            path
        } else {
            actions.push(self.set_flash(format!("No such path: {}", display_form(path)), true));
            ROOT
        };
        actions.extend(self.navigate(target));
        actions
    }

    /// Node shown in the table: the evaluation result, or the focused node.
    #[must_use]
    pub fn focused_node(&self) -> Option<&Value> {
        match &self.result {
            Some((_, value)) => Some(value),
            None => resolve(&self.root, &self.current_path),
        }
    }

    /// `(label, path, value)` for each child of the focused node.
    ///
    /// Children of an evaluation result have no path into the document.
    #[must_use]
    pub fn children(&self) -> Vec<(String, Option<String>, &Value)> {
        let base = self.result.is_none().then_some(self.current_path.as_str());
        match self.focused_node() {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| (k.clone(), base.map(|b| build_child_path(b, k)), v))
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), base.map(|b| build_index_path(b, i)), v))
                .collect(),
            Some(scalar) => vec![("value".to_string(), None, scalar)],
            None => vec![],
        }
    }

    /// Moves the table selection down by one, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let len = self.children().len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Moves the table selection up by one, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let len = self.children().len();
        if len == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.children().len().saturating_sub(1);
    }

    /// Path of the selected table row, if it addresses a document node.
    #[must_use]
    pub fn selected_child_path(&self) -> Option<String> {
        self.children().into_iter().nth(self.selected_index).and_then(|(_, path, _)| path)
    }

    /// Focuses `target` and builds the view the schema selects for it.
    ///
    /// A missing target leaves the focus unchanged and flashes an error.
    pub fn navigate(&mut self, target: &str) -> Vec<Action> {
        let _span = tracing::debug_span!("navigate", target).entered();

        let normalized = normalized_form(target);
        let Some(node) = resolve(&self.root, &normalized) else {
            tracing::debug!(path = %normalized, "navigation target missing");
            return vec![self.set_flash(format!("No such path: {}", display_form(target)), true)];
        };

        let kind = views::select_view_kind(self.schema.as_ref(), node);
        tracing::debug!(path = %normalized, ?kind, "focus changed");

        self.result = None;
        self.selected_index = 0;
        self.views.clear_browsing();
        self.view_kind = kind;
        self.current_path.clone_from(&normalized);

        let Some(schema) = self.schema.as_ref() else {
            return vec![];
        };
        let keep_status = kind == ViewKind::Status
            && self.views.status.is_some()
            && self.status_path.as_deref() == Some(normalized.as_str());
        if kind == ViewKind::Table || keep_status {
            return vec![];
        }

        let completion = if kind == ViewKind::Status {
            self.pending_completion.take()
        } else {
            None
        };
        let Some(view) = views::build_view(kind, schema, node, &normalized, self.key_mode, completion) else {
            self.view_kind = ViewKind::Table;
            return vec![];
        };
        if kind == ViewKind::Status {
            self.status_path = Some(normalized);
        }

        let init = view.as_active().init_command();
        let (view, _) = view.update(ViewEvent::Resize {
            width: self.width,
            height: self.body_rows(),
        });
        self.views.store(view);
        init.map(|command| self.apply_view_command(command)).unwrap_or_default()
    }

    /// Back: drops an evaluation result, otherwise focuses the parent.
    pub fn go_back(&mut self) -> Vec<Action> {
        if self.result.take().is_some() {
            self.selected_index = 0;
            return vec![];
        }
        if self.current_path == ROOT {
            return vec![];
        }
        let parent = strip_last_segment(&self.current_path);
        self.navigate(&parent)
    }

    /// Evaluates a non-path expression and shows its value.
    pub fn evaluate(&mut self, expr: &str) -> Vec<Action> {
        let _span = tracing::debug_span!("evaluate", expr).entered();
        match self.evaluator.evaluate(&self.root, expr) {
            Ok(value) => {
                self.result = Some((expr.to_string(), value));
                self.selected_index = 0;
                vec![]
            }
            Err(e) => {
                tracing::debug!(error = %e, "evaluation failed");
                vec![self.set_flash(e.to_string(), true)]
            }
        }
    }

    /// Shows a flash and returns the timer action that clears it.
    pub fn set_flash(&mut self, text: impl Into<String>, is_error: bool) -> Action {
        self.flash_generation += 1;
        self.flash = Some(Flash {
            text: text.into(),
            is_error,
        });
        Action::Schedule {
            after: FLASH_DURATION,
            event: Event::FlashClear {
                generation: self.flash_generation,
            },
        }
    }

    /// Clears the flash if `generation` is still current; returns whether it did.
    pub fn clear_flash(&mut self, generation: u64) -> bool {
        if generation != self.flash_generation || self.flash.is_none() {
            return false;
        }
        self.flash = None;
        true
    }

    /// Custom view matching `view_kind`, if its slot is filled.
    #[must_use]
    pub fn active_view(&self) -> Option<ActiveView<'_>> {
        resolve_active_view(self.view_kind, &self.views)
    }

    /// Opens the expression bar prefilled with the focused path.
    pub fn open_expression_bar(&mut self) {
        self.input_mode = InputMode::Expression;
        self.set_input(display_form(&self.current_path));
    }

    /// Closes the expression bar, dropping its input and suggestions.
    pub fn close_expression_bar(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor = 0;
        self.completion.clear();
    }

    /// Replaces the input, puts the cursor at its end and refreshes suggestions.
    pub fn set_input(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.input = text;
        self.completion.refresh(&self.root, &self.input);
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.input.char_indices().nth(cursor).map_or(self.input.len(), |(i, _)| i)
    }

    /// Inserts `c` at the cursor and refreshes suggestions.
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
        self.completion.refresh(&self.root, &self.input);
    }

    /// Backspace: removes the character before the cursor.
    pub fn delete_before_cursor(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.input.remove(at);
        self.completion.refresh(&self.root, &self.input);
    }

    /// Delete: removes the character under the cursor.
    pub fn delete_at_cursor(&mut self) {
        if self.cursor >= self.input.chars().count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.input.remove(at);
        self.completion.refresh(&self.root, &self.input);
    }

    /// Whether the cursor sits after the last character.
    #[must_use]
    pub fn cursor_at_end(&self) -> bool {
        self.cursor >= self.input.chars().count()
    }

    /// Executes a view command, turning it into host actions.
    pub fn apply_view_command(&mut self, command: ViewCommand) -> Vec<Action> {
        let mut actions = Vec::new();
        for command in command.flatten() {
            match command {
                ViewCommand::Quit => {
                    self.quitting = true;
                    actions.push(Action::Quit);
                }
                ViewCommand::Schedule { after, event } => actions.push(Action::Schedule {
                    after,
                    event: Event::View(event),
                }),
                ViewCommand::Copy(text) => actions.push(Action::Copy(text)),
                ViewCommand::OpenUrl(url) => actions.push(Action::OpenUrl(url)),
                ViewCommand::Navigate(path) => actions.extend(self.navigate(&path)),
                ViewCommand::Batch(_) => {}
            }
        }
        actions
    }

    /// Runs `event` through the view stored for `kind`.
    ///
    /// Returns `None` when there is no such view.
    pub fn dispatch_to_view(&mut self, kind: ViewKind, event: ViewEvent) -> Option<Vec<Action>> {
        let view = self.views.take(kind)?;
        let (view, command) = view.update(event);
        self.views.store(view);
        Some(command.map(|c| self.apply_view_command(c)).unwrap_or_default())
    }

    /// Non-blocking poll of the status view's completion channel.
    ///
    /// Returns the event to feed through `handle_event`, or `None` while the
    /// operation runs, after it resolved, or without a status view.
    pub fn poll_completion(&mut self) -> Option<Event> {
        self.views.status.as_mut()?.poll_completion().map(Event::View)
    }

    /// Rows left for the body at the last known terminal size.
    #[must_use]
    pub const fn body_rows(&self) -> usize {
        self.height.saturating_sub(CHROME_ROWS)
    }

    /// Render settings for a `width` x `height` area with this state's
    /// theme, color flag and key mode.
    #[must_use]
    pub const fn render_context(&self, width: usize, height: usize) -> RenderContext<'_> {
        RenderContext::new(&self.theme, width, height)
            .with_color(self.color)
            .with_key_mode(self.key_mode)
    }

    /// `(keys, description)` lines for the help overlay.
    #[must_use]
    pub fn help_entries(&self) -> Vec<(String, String)> {
        let m = self.key_mode;
        let mut entries: Vec<(String, String)> = [
            LogicalAction::Up,
            LogicalAction::Down,
            LogicalAction::Forward,
            LogicalAction::Back,
            LogicalAction::Enter,
            LogicalAction::Top,
            LogicalAction::Bottom,
            LogicalAction::Search,
            LogicalAction::CopyPath,
            LogicalAction::Help,
            LogicalAction::Quit,
        ]
        .into_iter()
        .map(|action| (m.hint(action), action.label().to_string()))
        .collect();
        entries.extend([
            ("tab / shift+tab".to_string(), "cycle completions".to_string()),
            ("↑ / ↓".to_string(), "browse suggestions".to_string()),
            ("→ / end".to_string(), "accept suggestion".to_string()),
            ("esc".to_string(), "close expression bar".to_string()),
        ]);
        entries
    }

    fn table_footer(&self) -> String {
        let m = self.key_mode;
        format!(
            "{}/{}: move  {}: open  {}: back  {}: path  {}: copy  {}: help  {}: quit",
            m.hint(LogicalAction::Up),
            m.hint(LogicalAction::Down),
            m.hint(LogicalAction::Forward),
            m.hint(LogicalAction::Back),
            m.hint(LogicalAction::Search),
            m.hint(LogicalAction::CopyPath),
            m.hint(LogicalAction::Help),
            m.hint(LogicalAction::Quit),
        )
    }

    fn compute_expression_bar(&self) -> ExpressionBarInfo {
        let suggestions = self.completion.suggestions();
        let highlighted = self.completion.highlighted();
        let partial = split_input(&self.input).partial.chars().count();
        let start = highlighted.map_or(0, |h| (h + 1).saturating_sub(MAX_SUGGESTIONS));

        ExpressionBarInfo {
            title: self
                .active_view()
                .and_then(|v| v.search_title())
                .unwrap_or_else(|| "Path".to_string()),
            input: self.input.clone(),
            cursor: self.cursor,
            suggestions: suggestions
                .iter()
                .enumerate()
                .skip(start)
                .take(MAX_SUGGESTIONS)
                .map(|(i, s)| SuggestionItem {
                    text: s.text.clone(),
                    matched: partial.min(s.text.chars().count()),
                    marker: s.kind.marker(),
                    hint: s.hint.clone(),
                    is_highlighted: highlighted == Some(i),
                })
                .collect(),
        }
    }

    /// Windowed KEY/VALUE rows centered on the selection.
    fn compute_table(&self, available_rows: usize) -> Body {
        let children = self.children();
        if children.is_empty() {
            return Body::Empty(match self.focused_node() {
                Some(Value::Object(_)) => EmptyState {
                    message: "Empty map".to_string(),
                    subtitle: format!("{}: back", self.key_mode.hint(LogicalAction::Back)),
                },
                Some(_) => EmptyState {
                    message: "Empty array".to_string(),
                    subtitle: format!("{}: back", self.key_mode.hint(LogicalAction::Back)),
                },
                None => EmptyState {
                    message: "Nothing here".to_string(),
                    subtitle: format!("{} is not in the document", display_form(&self.current_path)),
                },
            });
        }

        let available_rows = available_rows.max(1);
        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(children.len());
        if visible_end - visible_start < available_rows && children.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let rows = children[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(offset, (key, _, value))| TableRow {
                key: key.clone(),
                value: format::value_preview(value),
                kind: NodeKind::of(value),
                is_selected: visible_start + offset == self.selected_index,
            })
            .collect();
        Body::Table(rows)
    }

    /// Computes a renderable view model for a `rows` x `cols` terminal.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let expression_bar = (self.input_mode == InputMode::Expression).then(|| self.compute_expression_bar());
        let bar_rows = expression_bar
            .as_ref()
            .map_or(0, |bar| EXPRESSION_BAR_ROWS + bar.suggestions.len());
        let body_rows = rows.saturating_sub(CHROME_ROWS + bar_rows);
        let active = if self.result.is_some() { None } else { self.active_view() };

        let body = if self.show_help {
            Body::Help(self.help_entries())
        } else if let Some(view) = active {
            Body::Custom(view.render(&self.render_context(cols, body_rows)))
        } else {
            // one row goes to the column headings
            self.compute_table(body_rows.saturating_sub(1))
        };

        let path = match &self.result {
            Some((expr, _)) => expr.clone(),
            None => display_form(&self.current_path),
        };
        let position = match active {
            Some(view) => {
                let (count, selected, label) = view.position();
                (count > 0).then(|| format!("{selected}/{count} {label}"))
            }
            None => {
                let count = self.children().len();
                let label = match self.focused_node() {
                    Some(Value::Object(_)) => "keys",
                    Some(Value::Array(_)) => "items",
                    _ => "values",
                };
                (count > 0).then(|| format!("{}/{count} {label}", self.selected_index + 1))
            }
        };

        let keybindings = if self.input_mode == InputMode::Expression {
            "tab: complete  ↑/↓: browse  →: accept  enter: go  esc: cancel".to_string()
        } else if self.show_help {
            "any key: close help".to_string()
        } else {
            active.map_or_else(|| self.table_footer(), |view| view.footer())
        };

        UIViewModel {
            header: HeaderInfo {
                title: active.map_or_else(|| "nestview".to_string(), |view| view.title()),
                path,
                position,
            },
            expression_bar,
            body,
            flash: active.and_then(|view| view.flash().cloned()).or_else(|| self.flash.clone()),
            footer: FooterInfo { keybindings },
        }
    }
}
