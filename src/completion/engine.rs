//! Suggestion generation, cycling and commit.
//!
//! Input is split at its last unquoted separator into a *base* (the parent
//! expression, resolved to the focus node) and a *partial* token. Candidates
//! are the focus node's keys or indices followed by the catalog functions that
//! apply to its structural kind, filtered by the partial token.
//!
//! Two ways to accept a candidate exist and they differ on purpose:
//!
//! - Tab / Shift+Tab commits the candidate, including call syntax for functions.
//! - A cursor-move accept (Right / End) inserts key paths but, for a function,
//!   only moves the cursor to the end of the input.

use super::catalog::{CallStyle, FunctionCatalog};
use super::cycle::CompletionState;
use crate::domain::{resolve, NodeKind};
use crate::path::{self, build_child_path, build_index_path, scan_separators, wrap_global_call, ROOT};
use serde_json::Value;

/// What a candidate inserts when committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    /// Object member of the base node; committed as `.key` or `["key"]`.
    ChildKey,
    /// Array position of the base node; committed as `[n]`.
    ChildIndex,
    /// Catalog function taking the base node as an argument.
    ///
    /// Committing wraps the base path in the call, e.g. `size(_.items)`.
    GlobalFunction,
    /// Catalog function called on the base node, e.g. `_.name.startsWith()`.
    MethodFunction,
}

impl SuggestionKind {
    /// Keys and indices navigate; functions build an expression.
    #[must_use]
    pub const fn is_function(self) -> bool {
        matches!(self, Self::GlobalFunction | Self::MethodFunction)
    }

    /// Short marker shown next to the candidate in the suggestion list.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::ChildKey => "key",
            Self::ChildIndex => "index",
            Self::GlobalFunction => "fn()",
            Self::MethodFunction => ".fn()",
        }
    }
}

/// A completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Key, index or function name as shown in the suggestion list.
    pub text: String,
    /// How the suggestion is committed into the input.
    pub kind: SuggestionKind,
    /// Usage hint for functions, empty for keys and indices.
    pub hint: String,
}

impl Suggestion {
    #[must_use]
    pub fn new(text: impl Into<String>, kind: SuggestionKind, hint: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            hint: hint.into(),
        }
    }
}

/// Input split at its last unquoted separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputContext {
    /// Parent expression the partial token completes against.
    pub base: String,
    /// Text typed after the separator, with any opening quote removed.
    pub partial: String,
    /// The input ends exactly on a `.` separator.
    pub trailing_separator: bool,
}

/// Splits input into base and partial token.
///
/// Input without any separator completes against the root, so `_inte` is a
/// partial key and never mistaken for the root marker.
#[must_use]
pub fn split_input(input: &str) -> InputContext {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == ROOT {
        return InputContext {
            base: ROOT.to_string(),
            partial: String::new(),
            trailing_separator: false,
        };
    }

    let (dot, bracket) = scan_separators(trimmed);
    let base_or_root = |end: usize| {
        let base = trimmed[..end].trim();
        if base.is_empty() {
            ROOT.to_string()
        } else {
            base.to_string()
        }
    };

    match (dot, bracket) {
        (Some(d), b) if b.map_or(true, |b| d > b) => {
            let partial = trimmed[d + 1..].to_string();
            InputContext {
                base: base_or_root(d),
                trailing_separator: partial.is_empty(),
                partial,
            }
        }
        (_, Some(_)) if trimmed.ends_with(']') && path::is_complete_path(trimmed) => InputContext {
            base: trimmed.to_string(),
            partial: String::new(),
            trailing_separator: false,
        },
        (_, Some(b)) => {
            let partial = trimmed[b + 1..]
                .trim_start()
                .trim_start_matches(['"', '\''])
                .to_string();
            InputContext {
                base: base_or_root(b),
                partial,
                trailing_separator: false,
            }
        }
        (_, None) => InputContext {
            base: ROOT.to_string(),
            partial: trimmed.to_string(),
            trailing_separator: false,
        },
    }
}

fn matches_partial(text: &str, partial: &str) -> bool {
    partial.is_empty() || text.to_lowercase().starts_with(&partial.to_lowercase())
}

/// Key / index candidates and function candidates for `ctx`, each filtered.
fn candidates(root: &Value, ctx: &InputContext, catalog: &FunctionCatalog) -> (Vec<Suggestion>, Vec<Suggestion>) {
    let Some(focus) = resolve(root, &ctx.base) else {
        return (vec![], vec![]);
    };

    let children: Vec<Suggestion> = match focus {
        Value::Object(map) => map
            .keys()
            .filter(|k| matches_partial(k, &ctx.partial))
            .map(|k| Suggestion::new(k.clone(), SuggestionKind::ChildKey, ""))
            .collect(),
        Value::Array(items) => (0..items.len())
            .map(|i| i.to_string())
            .filter(|i| matches_partial(i, &ctx.partial))
            .map(|i| Suggestion::new(i, SuggestionKind::ChildIndex, ""))
            .collect(),
        _ => vec![],
    };

    let kind = NodeKind::of(focus).structural();
    let functions: Vec<Suggestion> = catalog
        .for_kind(kind)
        .filter(|entry| matches_partial(&entry.name, &ctx.partial))
        .map(|entry| {
            let kind = match entry.call_style() {
                CallStyle::Global => SuggestionKind::GlobalFunction,
                CallStyle::Method => SuggestionKind::MethodFunction,
            };
            Suggestion::new(entry.name.clone(), kind, entry.usage.clone())
        })
        .collect();

    (children, functions)
}

/// Suggestions in display order.
///
/// Keys come first, except when the input ends on a trailing dot: functions
/// are then listed ahead of keys.
#[must_use]
pub fn display_suggestions(root: &Value, input: &str, catalog: &FunctionCatalog) -> Vec<Suggestion> {
    let ctx = split_input(input);
    let (children, functions) = candidates(root, &ctx, catalog);
    if ctx.trailing_separator {
        functions.into_iter().chain(children).collect()
    } else {
        children.into_iter().chain(functions).collect()
    }
}

/// Suggestions in Tab-cycle order: always keys then functions.
#[must_use]
pub fn cycle_candidates(root: &Value, input: &str, catalog: &FunctionCatalog) -> Vec<Suggestion> {
    let ctx = split_input(input);
    let (children, functions) = candidates(root, &ctx, catalog);
    children.into_iter().chain(functions).collect()
}

/// Text produced by committing `suggestion` onto `base`.
#[must_use]
pub fn commit(base: &str, suggestion: &Suggestion) -> String {
    match suggestion.kind {
        SuggestionKind::ChildKey => build_child_path(base, &suggestion.text),
        SuggestionKind::ChildIndex => match suggestion.text.parse::<usize>() {
            Ok(i) => build_index_path(base, i),
            Err(_) => build_child_path(base, &suggestion.text),
        },
        SuggestionKind::GlobalFunction => wrap_global_call(&suggestion.text, base),
        SuggestionKind::MethodFunction => format!("{}.{}()", base.trim().trim_end_matches('.'), suggestion.text),
    }
}

/// Array index context at the end of the input: `name[` or `name[n]`.
fn index_context(input: &str) -> Option<(String, Option<usize>)> {
    let trimmed = input.trim();
    if let Some(base) = trimmed.strip_suffix('[') {
        let base = base.trim_end();
        return (!base.is_empty() && path::is_complete_path(base)).then(|| (base.to_string(), None));
    }
    if trimmed.ends_with(']') {
        let (_, bracket) = scan_separators(trimmed);
        let b = bracket?;
        let index = trimmed[b + 1..trimmed.len() - 1].trim().parse::<usize>().ok()?;
        let base = trimmed[..b].trim_end();
        return (!base.is_empty()).then(|| (base.to_string(), Some(index)));
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Result of accepting the highlighted suggestion with a cursor-move key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accept {
    /// Replace the input with this text.
    Insert(String),
    /// Leave the text alone; move the cursor to its end.
    MoveToEnd,
}

/// Completion state for one expression bar.
///
/// Owns the function catalog, the displayed suggestion list with its browse
/// highlight, and the Tab cycle. Every operation is total: no input makes it
/// fail, the worst case is an empty list or unchanged text.
#[derive(Debug, Clone, Default)]
pub struct CompletionEngine {
    catalog: FunctionCatalog,
    suggestions: Vec<Suggestion>,
    highlighted: Option<usize>,
    base: String,
    cycle: CompletionState,
}

impl CompletionEngine {
    #[must_use]
    pub fn new(catalog: FunctionCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &FunctionCatalog {
        &self.catalog
    }

    /// Recomputes the displayed suggestions after the input changed.
    ///
    /// Ends any active Tab cycle and clears the browse highlight.
    pub fn refresh(&mut self, root: &Value, input: &str) {
        let _span = tracing::trace_span!("completion_refresh", input_len = input.len()).entered();
        self.suggestions = display_suggestions(root, input, &self.catalog);
        self.base = split_input(input).base;
        self.highlighted = None;
        self.cycle.reset();
    }

    /// Drops all suggestions (expression bar closed).
    pub fn clear(&mut self) {
        self.suggestions.clear();
        self.highlighted = None;
        self.base.clear();
        self.cycle.reset();
    }

    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    #[must_use]
    pub const fn cycle(&self) -> &CompletionState {
        &self.cycle
    }

    /// Tab: commits the next candidate and returns the new input text.
    pub fn cycle_forward(&mut self, root: &Value, input: &str) -> Option<String> {
        self.step(root, input, Direction::Forward)
    }

    /// Shift+Tab: commits the previous candidate and returns the new input text.
    pub fn cycle_backward(&mut self, root: &Value, input: &str) -> Option<String> {
        self.step(root, input, Direction::Backward)
    }

    fn step(&mut self, root: &Value, input: &str, direction: Direction) -> Option<String> {
        let _span = tracing::debug_span!("completion_cycle", ?direction).entered();

        if !self.cycle.continues(input) {
            if let Some(text) = Self::step_index(root, input, direction) {
                tracing::debug!(result = %text, "index cycled");
                return Some(text);
            }
            let ctx = split_input(input);
            let candidates = cycle_candidates(root, input, &self.catalog);
            self.cycle.start(ctx.base, input, candidates);
        } else if direction == Direction::Backward {
            if let Some(origin) = self.cycle.rewind() {
                let text = origin.to_string();
                self.highlighted = None;
                tracing::debug!(result = %text, "completion rewound");
                return Some(text);
            }
        }

        let base = self.cycle.base().to_string();
        let selected = match direction {
            Direction::Forward => self.cycle.advance(),
            Direction::Backward => self.cycle.retreat(),
        }?
        .clone();
        let text = commit(&base, &selected);
        self.cycle.record_applied(&text);
        self.highlighted = self
            .suggestions
            .iter()
            .position(|s| s.text == selected.text && s.kind == selected.kind);
        tracing::debug!(candidate = %selected.text, result = %text, "completion committed");
        Some(text)
    }

    /// Cycles `[n]` within the bounds of the array addressed by the index base.
    fn step_index(root: &Value, input: &str, direction: Direction) -> Option<String> {
        let (base, current) = index_context(input)?;
        let len = match resolve(root, &base)? {
            Value::Array(items) if !items.is_empty() => items.len(),
            _ => return None,
        };
        let next = match (current, direction) {
            (None, Direction::Forward) => 0,
            (None, Direction::Backward) => len - 1,
            (Some(n), Direction::Forward) => (n.min(len - 1) + 1) % len,
            (Some(n), Direction::Backward) => (n.min(len - 1) + len - 1) % len,
        };
        Some(build_index_path(&base, next))
    }

    /// Up: moves the browse highlight without inserting anything.
    pub fn browse_prev(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            None | Some(0) => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Down: moves the browse highlight without inserting anything.
    pub fn browse_next(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1) % len));
    }

    /// Right / End: accepts the highlighted suggestion without call syntax.
    ///
    /// Keys and indices are inserted as child paths; a highlighted function,
    /// or no highlight at all, only moves the cursor to the end.
    #[must_use]
    pub fn accept(&self) -> Accept {
        match self.highlighted.and_then(|i| self.suggestions.get(i)) {
            Some(s) if !s.kind.is_function() => Accept::Insert(commit(&self.base, s)),
            _ => Accept::MoveToEnd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::catalog::FunctionEntry;
    use serde_json::json;

    fn catalog() -> FunctionCatalog {
        let entry = |name: &str, usage: &str, applies: &[&str]| FunctionEntry {
            name: name.into(),
            usage: usage.into(),
            description: String::new(),
            applies_to: applies.iter().map(|s| (*s).to_string()).collect(),
        };
        FunctionCatalog::from_entries(vec![
            entry("has", "has(map.field) -> bool", &["any"]),
            entry("size", "size(value) -> int", &["any"]),
            entry("exists", "list.exists(x, p) -> bool", &["array"]),
        ])
    }

    fn data() -> Value {
        json!({
            "pd1001": { "platform": { "os": "linux", "arch": "x86" } },
            "tasks": { "build-windows": {}, "build-linux": {}, "test": {} },
            "items": [ { "n": 1 }, { "n": 2 }, { "n": 3 } ],
            "size": 4
        })
    }

    #[test]
    fn splits_at_last_separator() {
        let ctx = split_input("_.pd1001.platform.");
        assert_eq!(ctx.base, "_.pd1001.platform");
        assert!(ctx.partial.is_empty());
        assert!(ctx.trailing_separator);

        let ctx = split_input("_.tasks[\"bui");
        assert_eq!(ctx.base, "_.tasks");
        assert_eq!(ctx.partial, "bui");

        let ctx = split_input("_inte");
        assert_eq!(ctx.base, "_");
        assert_eq!(ctx.partial, "_inte");
    }

    #[test]
    fn map_focus_offers_keys_then_functions() {
        let texts: Vec<_> = cycle_candidates(&data(), "_.pd1001.platform.", &catalog())
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["os", "arch", "has", "size"]);
    }

    #[test]
    fn trailing_dot_lists_functions_first_for_display() {
        let shown = display_suggestions(&data(), "_.pd1001.platform.", &catalog());
        assert!(shown[0].kind.is_function());
        assert_eq!(shown.last().map(|s| s.text.as_str()), Some("arch"));
    }

    #[test]
    fn array_focus_offers_indices_and_array_functions() {
        let shown = cycle_candidates(&data(), "_.items.", &catalog());
        let texts: Vec<_> = shown.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["0", "1", "2", "has", "size", "exists"]);
        assert_eq!(shown[0].kind, SuggestionKind::ChildIndex);
        assert_eq!(shown[5].kind, SuggestionKind::MethodFunction);
    }

    #[test]
    fn restricted_function_excluded_for_scalar() {
        let shown = cycle_candidates(&data(), "_.pd1001.platform.os.", &catalog());
        assert!(shown.iter().all(|s| s.text != "exists"));
        assert!(shown.iter().any(|s| s.text == "has"));
    }

    #[test]
    fn partial_filters_candidates() {
        let texts: Vec<_> = cycle_candidates(&data(), "_.tasks.build", &catalog())
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["build-windows", "build-linux"]);
        assert!(cycle_candidates(&data(), "_.tasks.zzz", &catalog()).is_empty());
        assert!(cycle_candidates(&data(), "_.missing.", &catalog()).is_empty());
    }

    #[test]
    fn commits_keys_and_functions() {
        let base = "_.pd1001.platform";
        assert_eq!(
            commit(base, &Suggestion::new("has", SuggestionKind::GlobalFunction, "")),
            "has(_.pd1001.platform)"
        );
        assert_eq!(
            commit("_.items", &Suggestion::new("exists", SuggestionKind::MethodFunction, "")),
            "_.items.exists()"
        );
        assert_eq!(
            commit("_.tasks", &Suggestion::new("build-windows", SuggestionKind::ChildKey, "")),
            "_.tasks[\"build-windows\"]"
        );
        assert_eq!(commit("_.items", &Suggestion::new("2", SuggestionKind::ChildIndex, "")), "_.items[2]");
    }

    #[test]
    fn tab_cycles_with_captured_base() {
        let root = data();
        let mut engine = CompletionEngine::new(catalog());
        let mut input = "_.pd1001.platform.".to_string();
        engine.refresh(&root, &input);

        let mut seen = Vec::new();
        for _ in 0..5 {
            input = engine.cycle_forward(&root, &input).unwrap();
            seen.push(input.clone());
        }
        assert_eq!(
            seen,
            vec![
                "_.pd1001.platform.os",
                "_.pd1001.platform.arch",
                "has(_.pd1001.platform)",
                "size(_.pd1001.platform)",
                "_.pd1001.platform.os",
            ]
        );
    }

    #[test]
    fn shift_tab_undoes_tab_within_cycle() {
        let root = data();
        let mut engine = CompletionEngine::new(catalog());
        let first = engine.cycle_forward(&root, "_.tasks.").unwrap();
        let second = engine.cycle_forward(&root, &first).unwrap();
        let back = engine.cycle_backward(&root, &second).unwrap();
        assert_eq!(back, first);
    }

    #[test]
    fn shift_tab_after_first_tab_restores_input() {
        let root = json!({"name": "demo", "items": [], "active": true});
        let mut engine = CompletionEngine::new(FunctionCatalog::empty());
        engine.refresh(&root, "_.");

        let first = engine.cycle_forward(&root, "_.").unwrap();
        assert_eq!(first, "_.name");
        assert_eq!(engine.cycle_backward(&root, &first).unwrap(), "_.");
        assert_eq!(engine.highlighted(), None);
        assert_eq!(engine.cycle_forward(&root, "_.").unwrap(), "_.name");
    }

    #[test]
    fn shift_tab_on_fresh_input_wraps_to_last() {
        let root = json!({"name": "demo", "items": [], "active": true});
        let mut engine = CompletionEngine::new(FunctionCatalog::empty());
        assert_eq!(engine.cycle_backward(&root, "_.").unwrap(), "_.active");
    }

    #[test]
    fn open_bracket_inserts_first_index_then_cycles_within_bounds() {
        let root = data();
        let mut engine = CompletionEngine::new(catalog());
        let mut input = engine.cycle_forward(&root, "_.items[").unwrap();
        assert_eq!(input, "_.items[0]");
        input = engine.cycle_forward(&root, &input).unwrap();
        assert_eq!(input, "_.items[1]");
        input = engine.cycle_forward(&root, "_.items[2]").unwrap();
        assert_eq!(input, "_.items[0]");
        assert_eq!(engine.cycle_backward(&root, "_.items[0]").unwrap(), "_.items[2]");
    }

    #[test]
    fn cursor_accept_never_inserts_call_syntax() {
        let root = data();
        let mut engine = CompletionEngine::new(catalog());
        engine.refresh(&root, "_.pd1001.platform.");

        // display order: has, size, os, arch
        engine.browse_next();
        assert_eq!(engine.accept(), Accept::MoveToEnd);

        engine.browse_next();
        engine.browse_next();
        assert_eq!(engine.accept(), Accept::Insert("_.pd1001.platform.os".into()));
    }

    #[test]
    fn browse_wraps_both_ways() {
        let root = data();
        let mut engine = CompletionEngine::new(FunctionCatalog::empty());
        engine.refresh(&root, "_.pd1001.platform.");
        engine.browse_prev();
        assert_eq!(engine.highlighted(), Some(1));
        engine.browse_next();
        assert_eq!(engine.highlighted(), Some(0));
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let root = data();
        let mut engine = CompletionEngine::new(catalog());
        assert_eq!(engine.cycle_forward(&root, "_.nothing.here."), None);
        engine.refresh(&root, "((((");
        assert!(engine.suggestions().is_empty());
    }
}
