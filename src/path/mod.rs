//! Path addressing for the browsed data tree.
//!
//! Paths start at the root marker [`ROOT`] and continue with `.identifier`,
//! `["quoted key"]` or `[N]` segments. Raw user input is accepted in looser
//! shapes (`tasks.build-windows`, `items.0`) and converted to a canonical form
//! before it is shown or used for navigation.
//!
//! # Examples
//!
//! ```
//! use nestview::path::{build_child_path, normalized_form, wrap_global_call};
//!
//! assert_eq!(normalized_form("tasks.build-windows"), "_.tasks[\"build-windows\"]");
//! assert_eq!(build_child_path("_.tasks", "build-windows"), "_.tasks[\"build-windows\"]");
//! assert_eq!(wrap_global_call("has()", "_.pd1001.platform"), "has(_.pd1001.platform)");
//! ```

mod forms;
mod segments;

/// Root marker that begins every canonical path.
pub const ROOT: &str = "_";

pub use forms::{
    base_for_global, build_child_path, build_index_path, display_form, is_complete_path, last_unquoted_dot_index,
    normalized_form, quote_key, strip_last_segment, wrap_global_call,
};
pub use segments::{is_expression, is_numeric, is_valid_identifier, parse_segments, split_segments, Segment};
pub(crate) use segments::scan_separators;
