//! Conversions between raw, display and normalized path forms.
//!
//! - *raw*: whatever the user typed (`tasks.build-windows`, `items.0`)
//! - *display*: canonical and rooted, for re-display (`_.tasks["build-windows"]`)
//! - *normalized*: display plus numeric dot segments as indices (`_.items[0]`)
//!
//! For every input `x`, `normalized_form(display_form(normalized_form(x)))`
//! equals `normalized_form(x)`.

use super::segments::{
    is_balanced, is_expression, is_numeric, is_valid_identifier, parse_segments, scan_separators, Segment,
};
use super::ROOT;

/// Canonical rooted rendering of a raw path.
///
/// Empty or root-only input gives the bare root marker. Literals (text that
/// starts with a quote or a bracket) and expressions are returned unchanged.
/// Otherwise a root prefix is added and every segment failing the identifier
/// grammar is rewritten as a quoted bracket.
#[must_use]
pub fn display_form(raw: &str) -> String {
    render(raw, false)
}

/// Like [`display_form`], but purely numeric dot segments become bracket
/// indices (`.0` → `[0]`). Used for navigation.
#[must_use]
pub fn normalized_form(raw: &str) -> String {
    render(raw, true)
}

fn render(raw: &str, numeric_as_index: bool) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ROOT {
        return ROOT.to_string();
    }
    if is_literal(trimmed) || is_expression(trimmed) {
        return trimmed.to_string();
    }

    let mut out = String::from(ROOT);
    for segment in parse_segments(trimmed) {
        match segment {
            Segment::Index(i) => push_index(&mut out, i),
            Segment::Key(k) if numeric_as_index && is_numeric(&k) => match k.parse::<usize>() {
                Ok(i) => push_index(&mut out, i),
                Err(_) => push_key(&mut out, &k),
            },
            Segment::Key(k) | Segment::Quoted(k) => push_key(&mut out, &k),
        }
    }
    out
}

/// A quoted string or bracket literal, never rewritten.
fn is_literal(s: &str) -> bool {
    s.starts_with('"') || s.starts_with('\'') || s.starts_with('[')
}

fn push_index(out: &mut String, index: usize) {
    out.push('[');
    out.push_str(&index.to_string());
    out.push(']');
}

fn push_key(out: &mut String, key: &str) {
    if is_valid_identifier(key) {
        out.push('.');
        out.push_str(key);
    } else {
        out.push('[');
        out.push_str(&quote_key(key));
        out.push(']');
    }
}

/// Wraps a key in double quotes, escaping backslashes and quotes.
#[must_use]
pub fn quote_key(key: &str) -> String {
    let mut quoted = String::with_capacity(key.len() + 2);
    quoted.push('"');
    for c in key.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn base_or_root(base_path: &str) -> &str {
    let base = base_path.trim().trim_end_matches('.');
    if base.is_empty() {
        ROOT
    } else {
        base
    }
}

/// Appends one key segment to `base_path`, quoting it when it is not an identifier.
#[must_use]
pub fn build_child_path(base_path: &str, key: &str) -> String {
    let mut out = base_or_root(base_path).to_string();
    push_key(&mut out, key);
    out
}

/// Appends a bracket index segment to `base_path`.
#[must_use]
pub fn build_index_path(base_path: &str, index: usize) -> String {
    let mut out = base_or_root(base_path).to_string();
    push_index(&mut out, index);
    out
}

/// Whether the input denotes a fully resolvable node.
///
/// False while a trailing dot, an open bracket, an open quote or a partial
/// token is pending. Enter navigates only when this holds.
#[must_use]
pub fn is_complete_path(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed == ROOT {
        return true;
    }
    if !is_balanced(trimmed) {
        return false;
    }
    match trimmed.chars().last() {
        Some(']' | ')') => true,
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
            let token = last_token(trimmed);
            !token.is_empty()
        }
        _ => false,
    }
}

fn last_token(input: &str) -> &str {
    match last_unquoted_dot_index(input) {
        Some(idx) => &input[idx + 1..],
        None => input,
    }
}

/// Byte offset of the final `.` that is outside quotes and brackets.
#[must_use]
pub fn last_unquoted_dot_index(input: &str) -> Option<usize> {
    scan_separators(input).0
}

/// Removes the final segment (or a trailing dot) from `input`.
///
/// Separators inside quotes are ignored. Input without a separator yields
/// the root marker.
#[must_use]
pub fn strip_last_segment(input: &str) -> String {
    let trimmed = input.trim();
    let (dot, bracket) = scan_separators(trimmed);
    let cut = match (dot, bracket) {
        (Some(d), Some(b)) => Some(d.max(b)),
        (Some(d), None) => Some(d),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    };
    match cut {
        Some(idx) if idx > 0 => trimmed[..idx].to_string(),
        _ => ROOT.to_string(),
    }
}

/// Parent expression used when wrapping a global-style function call.
///
/// `_.pd1001.platform.` → `_.pd1001.platform`.
#[must_use]
pub fn base_for_global(input: &str) -> String {
    strip_last_segment(input)
}

/// Formats `function_name(base_expr)`, dropping call parentheses already
/// present on the name (`has()` → `has`).
#[must_use]
pub fn wrap_global_call(function_name: &str, base_expr: &str) -> String {
    let mut name = function_name.trim();
    while let Some(stripped) = name.strip_suffix("()") {
        name = stripped.trim_end();
    }
    let name = name.trim_end_matches('(');
    format!("{name}({})", base_expr.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_of_root_and_empty() {
        assert_eq!(display_form(""), "_");
        assert_eq!(display_form("_"), "_");
        assert_eq!(display_form("  _  "), "_");
    }

    #[test]
    fn display_adds_root_and_quotes_non_identifiers() {
        assert_eq!(display_form("tasks.build"), "_.tasks.build");
        assert_eq!(display_form("tasks.build-windows"), "_.tasks[\"build-windows\"]");
        assert_eq!(display_form("_.items.0"), "_.items[\"0\"]");
        assert_eq!(display_form("_.items[0]"), "_.items[0]");
    }

    #[test]
    fn literals_are_unchanged() {
        assert_eq!(display_form("\"hello.world\""), "\"hello.world\"");
        assert_eq!(display_form("[1, 2]"), "[1, 2]");
        assert_eq!(normalized_form("[\"a\"]"), "[\"a\"]");
    }

    #[test]
    fn normalized_rewrites_numeric_segments() {
        assert_eq!(normalized_form("tasks.build-windows"), "_.tasks[\"build-windows\"]");
        assert_eq!(normalized_form("items.0.name"), "_.items[0].name");
        assert_eq!(normalized_form("_[\"0\"]"), "_[\"0\"]");
    }

    #[test]
    fn underscore_identifiers_survive() {
        assert_eq!(normalized_form("_internal.x"), "_._internal.x");
        assert_eq!(normalized_form("__x"), "_.__x");
        assert_eq!(display_form("_._"), "_._");
    }

    #[test]
    fn round_trip_is_stable() {
        let inputs = [
            "",
            "_",
            "a",
            "tasks.build-windows",
            "items.0.name",
            "_[\"a.b\"][2]",
            "_[\"0\"].x",
            "x[\"q\\\"uote\"]",
            "_internal.__y",
            "a..b.",
            "_.a[\"x",
            "has(_.a)",
            "[1,2]",
            "k[ 7 ]",
        ];
        for x in inputs {
            let n = normalized_form(x);
            assert_eq!(normalized_form(&display_form(&n)), n, "round trip failed for {x:?}");
        }
    }

    #[test]
    fn child_paths_quote_when_needed() {
        assert_eq!(build_child_path("_", "name"), "_.name");
        assert_eq!(build_child_path("_.tasks", "build-windows"), "_.tasks[\"build-windows\"]");
        assert_eq!(build_child_path("_.a.", "b"), "_.a.b");
        assert_eq!(build_child_path("", "x"), "_.x");
        assert_eq!(build_index_path("_.items", 2), "_.items[2]");
    }

    #[test]
    fn completeness() {
        assert!(is_complete_path("_"));
        assert!(is_complete_path("_.a"));
        assert!(is_complete_path("_.items[0]"));
        assert!(is_complete_path("_.tasks[\"build-windows\"]"));
        assert!(!is_complete_path(""));
        assert!(!is_complete_path("_.a."));
        assert!(!is_complete_path("_.a["));
        assert!(!is_complete_path("_.a[\"x"));
        assert!(!is_complete_path("_.a-"));
    }

    #[test]
    fn parent_paths() {
        assert_eq!(base_for_global("_.pd1001.platform."), "_.pd1001.platform");
        assert_eq!(strip_last_segment("_.pd1001.platform"), "_.pd1001");
        assert_eq!(strip_last_segment("_.a[\"x.y\"]"), "_.a");
        assert_eq!(strip_last_segment("_.a[3]"), "_.a");
        assert_eq!(strip_last_segment("_.a"), "_");
        assert_eq!(strip_last_segment("tasks"), "_");
        assert_eq!(strip_last_segment("_"), "_");
        assert_eq!(last_unquoted_dot_index("_.a[\"b.c\"]"), Some(1));
        assert_eq!(last_unquoted_dot_index("abc"), None);
    }

    #[test]
    fn global_call_wrapping() {
        assert_eq!(wrap_global_call("has()", "_.pd1001.platform"), "has(_.pd1001.platform)");
        assert_eq!(wrap_global_call("size", "_.items"), "size(_.items)");
        assert_eq!(wrap_global_call("int(", "_.n"), "int(_.n)");
    }
}
