//! User interface rendering layer with component-based architecture.
//!
//! This module turns application state into frames of ANSI-styled text
//! through composable rendering components. It provides theme support,
//! color-free output and responsive layout.
//!
//! # Architecture
//!
//! The UI layer follows a declarative rendering model:
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → frame lines
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`context`]: Per-frame viewport, theme and color settings
//! - [`helpers`]: Shared text utilities (centering, highlighting)
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation
//!
//! # Example
//!
//! ```
//! use nestview::app::AppState;
//! use nestview::ui::{render, Theme};
//! use serde_json::json;
//!
//! let state = AppState::new(json!({"name": "demo"}), Theme::default());
//! let frame = render(&state, 24, 80);
//! assert!(frame.contains("demo"));
//! ```

pub mod components;
pub mod context;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use context::RenderContext;
pub use renderer::{render, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{
    Body, EmptyState, ExpressionBarInfo, FooterInfo, HeaderInfo, SuggestionItem, TableRow, UIViewModel,
};
