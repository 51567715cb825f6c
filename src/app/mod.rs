//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the terminal host (main.rs) and the domain,
//! completion and view layers. It owns every state transition of the
//! browser.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Key / Resize → Events → Event Handler → State Mutations → Actions → Side Effects
//!                              ↑                                     ↓
//!                              └──── Scheduled events, completion ───┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and key routing
//! - [`modes`]: Input mode type
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```
//! use nestview::app::{handle_event, AppState, Event};
//! use nestview::domain::Key;
//! use nestview::ui::Theme;
//! use serde_json::json;
//!
//! let mut state = AppState::new(json!({"items": [1, 2]}), Theme::default());
//! let (_, actions) = handle_event(&mut state, &Event::Key(Key::Down))?;
//! assert!(actions.is_empty());
//! # Ok::<(), nestview::domain::NestviewError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::InputMode;
pub use state::AppState;
