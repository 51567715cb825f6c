//! Custom views: pluggable presentations of the focused node.
//!
//! A view is one of three variants, [`ListView`], [`DetailView`] or
//! [`StatusView`], wrapped in the [`CustomView`] tagged enum. The application
//! keeps one optional state per variant in [`ViewStates`] plus a [`ViewKind`]
//! discriminant; [`resolve_active_view`] pairs them up. A discriminant whose
//! state is missing yields no view, and the default KEY/VALUE table is shown.
//!
//! Views are updated Elm style: `update` consumes the view and one
//! [`ViewEvent`], and returns the next view plus an optional [`ViewCommand`]
//! for the host to carry out. Timers are expressed as
//! [`ViewCommand::Schedule`] and come back later as ordinary events.

pub mod detail;
pub mod format;
pub mod list;
pub mod status;

pub use detail::DetailView;
pub use list::{ListItem, ListView};
pub use status::{Phase, StatusView};

use crate::domain::{Key, KeyMode};
use crate::schema::ViewSchema;
use crate::ui::RenderContext;
use crate::worker::{CompletionReceiver, OperationOutcome};
use serde_json::Value;
use std::time::Duration;

/// How long a flash message stays up.
pub const FLASH_DURATION: Duration = Duration::from_secs(2);

/// Which presentation is active for the focused node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Default KEY/VALUE table; no custom view.
    #[default]
    Table,
    List,
    Detail,
    Status,
}

/// Input delivered to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Key(Key),
    /// Viewport changed; views that lay out text eagerly re-wrap.
    Resize { width: usize, height: usize },
    /// Spinner / elapsed-time tick.
    Tick,
    /// The status deadline passed.
    Timeout,
    /// The external operation finished.
    Completion(OperationOutcome),
    /// Clears the flash set under `generation`, if it is still current.
    FlashClear { generation: u64 },
    /// Delayed termination after a terminal status phase.
    DoneExit,
}

/// Follow-up work requested by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Quit,
    Schedule { after: Duration, event: ViewEvent },
    Copy(String),
    OpenUrl(String),
    /// Focus another node by path.
    Navigate(String),
    Batch(Vec<ViewCommand>),
}

impl ViewCommand {
    /// Flattens nested batches into a list of leaf commands.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::Batch(commands) => commands.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }

    /// Joins optional commands into one, batching when more than one is present.
    #[must_use]
    pub fn batch(commands: impl IntoIterator<Item = Option<Self>>) -> Option<Self> {
        let mut commands: Vec<Self> = commands.into_iter().flatten().collect();
        match commands.len() {
            0 => None,
            1 => commands.pop(),
            _ => Some(Self::Batch(commands)),
        }
    }
}

/// Transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub text: String,
    pub is_error: bool,
}

/// `(count, selected index 1-based, label)` for the position indicator.
pub type Position = (usize, usize, String);

/// One custom view.
#[derive(Debug)]
pub enum CustomView {
    List(ListView),
    Detail(DetailView),
    Status(StatusView),
}

/// Borrowed view of whichever custom view is active.
#[derive(Debug, Clone, Copy)]
pub enum ActiveView<'a> {
    List(&'a ListView),
    Detail(&'a DetailView),
    Status(&'a StatusView),
}

/// Per-variant view state.
#[derive(Debug, Default)]
pub struct ViewStates {
    pub list: Option<ListView>,
    pub detail: Option<DetailView>,
    pub status: Option<StatusView>,
}

/// Returns the view matching `kind`, or `None` when that state is absent.
///
/// Never substitutes another variant's state.
#[must_use]
pub fn resolve_active_view(kind: ViewKind, states: &ViewStates) -> Option<ActiveView<'_>> {
    match kind {
        ViewKind::Table => None,
        ViewKind::List => states.list.as_ref().map(ActiveView::List),
        ViewKind::Detail => states.detail.as_ref().map(ActiveView::Detail),
        ViewKind::Status => states.status.as_ref().map(ActiveView::Status),
    }
}

impl ViewStates {
    /// Moves the view for `kind` out of its slot.
    pub fn take(&mut self, kind: ViewKind) -> Option<CustomView> {
        match kind {
            ViewKind::Table => None,
            ViewKind::List => self.list.take().map(CustomView::List),
            ViewKind::Detail => self.detail.take().map(CustomView::Detail),
            ViewKind::Status => self.status.take().map(CustomView::Status),
        }
    }

    /// Puts a view back into the slot of its own variant.
    pub fn store(&mut self, view: CustomView) {
        match view {
            CustomView::List(v) => self.list = Some(v),
            CustomView::Detail(v) => self.detail = Some(v),
            CustomView::Status(v) => self.status = Some(v),
        }
    }

    /// Drops list and detail state; status state survives navigation.
    pub fn clear_browsing(&mut self) {
        self.list = None;
        self.detail = None;
    }
}

impl CustomView {
    #[must_use]
    pub const fn kind(&self) -> ViewKind {
        match self {
            Self::List(_) => ViewKind::List,
            Self::Detail(_) => ViewKind::Detail,
            Self::Status(_) => ViewKind::Status,
        }
    }

    #[must_use]
    pub const fn as_active(&self) -> ActiveView<'_> {
        match self {
            Self::List(v) => ActiveView::List(v),
            Self::Detail(v) => ActiveView::Detail(v),
            Self::Status(v) => ActiveView::Status(v),
        }
    }

    /// Consumes one event; returns the next view and an optional command.
    #[must_use]
    pub fn update(self, event: ViewEvent) -> (Self, Option<ViewCommand>) {
        match self {
            Self::List(v) => {
                let (v, cmd) = v.update(event);
                (Self::List(v), cmd)
            }
            Self::Detail(v) => {
                let (v, cmd) = v.update(event);
                (Self::Detail(v), cmd)
            }
            Self::Status(v) => {
                let (v, cmd) = v.update(event);
                (Self::Status(v), cmd)
            }
        }
    }
}

impl ActiveView<'_> {
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::List(v) => v.title(),
            Self::Detail(v) => v.title(),
            Self::Status(v) => v.title(),
        }
    }

    #[must_use]
    pub fn footer(&self) -> String {
        match self {
            Self::List(v) => v.footer(),
            Self::Detail(v) => v.footer(),
            Self::Status(v) => v.footer(),
        }
    }

    /// Whether the view handles search-mode keys itself, suppressing the
    /// expression bar.
    #[must_use]
    pub const fn consumes_search(&self) -> bool {
        match self {
            Self::List(v) => v.consumes_search(),
            Self::Detail(_) => false,
            Self::Status(_) => true,
        }
    }

    /// Command to run once when the view becomes active.
    #[must_use]
    pub fn init_command(&self) -> Option<ViewCommand> {
        match self {
            Self::List(_) | Self::Detail(_) => None,
            Self::Status(v) => v.init_command(),
        }
    }

    /// Replacement title for the search bar while this view is active.
    #[must_use]
    pub fn search_title(&self) -> Option<String> {
        match self {
            Self::List(v) => v.search_title(),
            Self::Detail(_) | Self::Status(_) => None,
        }
    }

    #[must_use]
    pub fn flash(&self) -> Option<&Flash> {
        match self {
            Self::List(_) | Self::Detail(_) => None,
            Self::Status(v) => v.flash(),
        }
    }

    /// Renders the content area (without header and footer).
    #[must_use]
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        match self {
            Self::List(v) => v.render(ctx),
            Self::Detail(v) => v.render(ctx),
            Self::Status(v) => v.render(ctx),
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::List(v) => v.position(),
            Self::Detail(v) => v.position(),
            Self::Status(v) => v.position(),
        }
    }
}

/// Chooses the presentation for `node` under `schema`.
///
/// A status config claims any map node; a list config claims arrays and maps
/// whose values are all maps; a detail config claims remaining maps.
#[must_use]
pub fn select_view_kind(schema: Option<&ViewSchema>, node: &Value) -> ViewKind {
    let Some(schema) = schema else {
        return ViewKind::Table;
    };
    let is_record_collection = match node {
        Value::Array(_) => true,
        Value::Object(map) => !map.is_empty() && map.values().all(Value::is_object),
        _ => false,
    };

    if schema.status.is_some() && node.is_object() && !is_record_collection {
        ViewKind::Status
    } else if schema.list.is_some() && is_record_collection {
        ViewKind::List
    } else if schema.detail.is_some() && node.is_object() {
        ViewKind::Detail
    } else {
        ViewKind::Table
    }
}

/// Builds the view state for `kind` at `path`.
///
/// `completion` is handed to a status view and ignored otherwise.
#[must_use]
pub fn build_view(
    kind: ViewKind,
    schema: &ViewSchema,
    node: &Value,
    path: &str,
    key_mode: KeyMode,
    completion: Option<CompletionReceiver>,
) -> Option<CustomView> {
    let view = match kind {
        ViewKind::Table => return None,
        ViewKind::List => CustomView::List(ListView::new(schema, schema.list.as_ref()?, node, path, key_mode)),
        ViewKind::Detail => CustomView::Detail(DetailView::new(schema.detail.as_ref()?, node, path, key_mode)),
        ViewKind::Status => {
            CustomView::Status(StatusView::new(schema, schema.status.as_ref()?, node, key_mode, completion))
        }
    };
    tracing::debug!(kind = ?view.kind(), path, "view built");
    Some(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DetailConfig, ListConfig, StatusConfig};
    use serde_json::json;

    fn schema() -> ViewSchema {
        ViewSchema {
            list: Some(ListConfig {
                title_field: "name".into(),
                subtitle_field: None,
                max_subtitle_lines: 2,
                badge_fields: vec![],
                secondary_fields: vec![],
            }),
            detail: Some(DetailConfig::default()),
            ..ViewSchema::default()
        }
    }

    #[test]
    fn resolver_returns_matching_state_only() {
        let mut states = ViewStates::default();
        assert!(resolve_active_view(ViewKind::List, &states).is_none());
        assert!(resolve_active_view(ViewKind::Table, &states).is_none());

        let node = json!([{"name": "a"}]);
        states.store(build_view(ViewKind::List, &schema(), &node, "_", KeyMode::Vim, None).unwrap());
        assert!(matches!(resolve_active_view(ViewKind::List, &states), Some(ActiveView::List(_))));
        // a discriminant without state never falls back to another variant
        assert!(resolve_active_view(ViewKind::Detail, &states).is_none());
        assert!(resolve_active_view(ViewKind::Status, &states).is_none());
    }

    #[test]
    fn take_and_store_round_trip_the_slot() {
        let mut states = ViewStates::default();
        let node = json!({"name": "a"});
        states.store(build_view(ViewKind::Detail, &schema(), &node, "_", KeyMode::Vim, None).unwrap());
        let view = states.take(ViewKind::Detail).unwrap();
        assert!(states.detail.is_none());
        states.store(view);
        assert!(states.detail.is_some());
    }

    #[test]
    fn view_kind_follows_node_shape() {
        let schema = schema();
        assert_eq!(select_view_kind(Some(&schema), &json!([1, 2])), ViewKind::List);
        assert_eq!(select_view_kind(Some(&schema), &json!({"a": {}, "b": {}})), ViewKind::List);
        assert_eq!(select_view_kind(Some(&schema), &json!({"a": 1})), ViewKind::Detail);
        assert_eq!(select_view_kind(Some(&schema), &json!("x")), ViewKind::Table);
        assert_eq!(select_view_kind(None, &json!([1])), ViewKind::Table);

        let status = ViewSchema {
            status: Some(StatusConfig::default()),
            ..ViewSchema::default()
        };
        assert_eq!(select_view_kind(Some(&status), &json!({"code": "X"})), ViewKind::Status);
    }

    #[test]
    fn batches_flatten() {
        let cmd = ViewCommand::batch([Some(ViewCommand::Quit), None, Some(ViewCommand::Copy("x".into()))]);
        assert_eq!(
            cmd.map(ViewCommand::flatten),
            Some(vec![ViewCommand::Quit, ViewCommand::Copy("x".into())])
        );
        assert_eq!(ViewCommand::batch([None]), None);
    }
}
