//! Context- and type-aware completion for the expression bar.
//!
//! - [`catalog`]: functions offered as candidates and how they are called
//! - [`engine`]: candidate generation, ordering and commit
//! - [`cycle`]: Tab / Shift+Tab cycling state
//!
//! # Example
//!
//! ```
//! use nestview::completion::{CompletionEngine, FunctionCatalog};
//! use serde_json::json;
//!
//! let root = json!({"name": "a", "items": [], "active": true});
//! let mut engine = CompletionEngine::new(FunctionCatalog::empty());
//! let mut input = "_.".to_string();
//! let mut seen = Vec::new();
//! for _ in 0..4 {
//!     input = engine.cycle_forward(&root, &input).unwrap_or(input);
//!     seen.push(input.clone());
//! }
//! assert_eq!(seen, ["_.name", "_.items", "_.active", "_.name"]);
//! ```

pub mod catalog;
pub mod cycle;
pub mod engine;

pub use catalog::{CallStyle, FunctionCatalog, FunctionEntry};
pub use cycle::CompletionState;
pub use engine::{
    commit, cycle_candidates, display_suggestions, split_input, Accept, CompletionEngine, InputContext, Suggestion,
    SuggestionKind,
};
