//! Domain layer for nestview.
//!
//! This module contains the core domain types, independent of the terminal
//! backend and of rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`key`]: Host-agnostic key presses
//! - [`keymap`]: Key modes and the logical actions they map to
//! - [`node`]: Node kinds, path resolution, document loading and the evaluator seam
//!
//! # Examples
//!
//! ```
//! use nestview::domain::{parse_document, resolve, Result};
//!
//! fn first_name() -> Result<Option<String>> {
//!     let root = parse_document(r#"{"items":[{"name":"a"}]}"#, false)?;
//!     Ok(resolve(&root, "items.0.name").and_then(|v| v.as_str().map(String::from)))
//! }
//! ```

pub mod error;
pub mod key;
pub mod keymap;
pub mod node;

pub use error::{NestviewError, Result};
pub use key::Key;
pub use keymap::{KeyMode, LogicalAction};
pub use node::{load_document, parse_document, resolve, Evaluator, NodeKind, PathEvaluator, StructuralKind};
