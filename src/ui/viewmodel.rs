//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They hold no
//! logic, only display-ready data: truncation, windowing and selection have
//! already been decided.
//!
//! # Example
//!
//! ```
//! use nestview::ui::viewmodel::{Body, FooterInfo, HeaderInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo { title: "nestview".into(), path: "_".into(), position: None },
//!     expression_bar: None,
//!     body: Body::Table(vec![]),
//!     flash: None,
//!     footer: FooterInfo { keybindings: "q: quit".into() },
//! };
//! assert!(vm.expression_bar.is_none());
//! ```

use crate::domain::NodeKind;
use crate::views::Flash;

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Present while the expression bar is open.
    pub expression_bar: Option<ExpressionBarInfo>,

    pub body: Body,

    /// Transient notification shown above the footer.
    pub flash: Option<Flash>,

    pub footer: FooterInfo,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Display form of the focused path (or the evaluated expression).
    pub path: String,
    /// Position indicator, e.g. `3/12 keys`.
    pub position: Option<String>,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding hints for the current mode.
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Expression bar contents and its suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionBarInfo {
    /// Label in front of the input, `Path` unless a view overrides it.
    pub title: String,
    pub input: String,
    /// Cursor position in characters.
    pub cursor: usize,
    /// Visible window of the suggestion list.
    pub suggestions: Vec<SuggestionItem>,
}

/// One entry of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionItem {
    pub text: String,
    /// Leading characters of `text` matched by the typed partial.
    pub matched: usize,
    /// Kind marker (`key`, `index`, `fn()`, `.fn()`).
    pub marker: &'static str,
    pub hint: String,
    pub is_highlighted: bool,
}

/// One row of the KEY/VALUE table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub key: String,
    /// One-line preview of the value.
    pub value: String,
    pub kind: NodeKind,
    pub is_selected: bool,
}

/// Main content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Default KEY/VALUE table (already windowed).
    Table(Vec<TableRow>),
    /// Output of the active custom view.
    Custom(String),
    Empty(EmptyState),
    /// Help overlay: `(keys, description)` pairs.
    Help(Vec<(String, String)>),
}
