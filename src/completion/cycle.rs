//! Tab-cycling state over a deduplicated candidate list.

use super::engine::Suggestion;
use std::collections::HashSet;

/// Ordered candidates plus a wrapping selection cursor.
///
/// A cursor of `None` means no candidate has been committed yet. The base
/// expression is captured when the cycle starts, so every commit in the cycle
/// is applied to the same parent even though the input text keeps changing.
///
/// The input the cycle started from is kept too: Shift+Tab right after the
/// first Tab of a cycle returns to it instead of wrapping to the last
/// candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionState {
    /// Deduplicated candidates in cycle order.
    candidates: Vec<Suggestion>,
    /// Parent expression every commit is applied to.
    base: String,
    /// Input text before the first commit.
    origin: String,
    cursor: Option<usize>,
    /// Text produced by the last commit or rewind.
    last_applied: Option<String>,
    /// Only the first Tab of the cycle has happened so far.
    first_step: bool,
}

impl CompletionState {
    /// Begins a new cycle, dropping any candidate whose text was already seen.
    pub fn start(&mut self, base: String, origin: &str, candidates: Vec<Suggestion>) {
        let mut seen = HashSet::new();
        self.candidates = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.text.clone()))
            .collect();
        self.base = base;
        self.origin = origin.to_string();
        self.cursor = None;
        self.last_applied = None;
        self.first_step = false;
        tracing::trace!(count = self.candidates.len(), base = %self.base, "completion cycle started");
    }

    /// Clears the cycle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` while the input still equals the text this cycle last produced.
    #[must_use]
    pub fn continues(&self, input: &str) -> bool {
        !self.candidates.is_empty() && self.last_applied.as_deref() == Some(input.trim())
    }

    /// Moves to the next candidate, wrapping past the end back to the first.
    pub fn advance(&mut self) -> Option<&Suggestion> {
        let len = self.candidates.len();
        if len == 0 {
            return None;
        }
        let next = self.cursor.map_or(0, |i| (i + 1) % len);
        self.first_step = self.cursor.is_none();
        self.cursor = Some(next);
        self.candidates.get(next)
    }

    /// Moves to the previous candidate, wrapping before the first to the last.
    pub fn retreat(&mut self) -> Option<&Suggestion> {
        let len = self.candidates.len();
        if len == 0 {
            return None;
        }
        let prev = match self.cursor {
            None | Some(0) => len - 1,
            Some(i) => i - 1,
        };
        self.first_step = false;
        self.cursor = Some(prev);
        self.candidates.get(prev)
    }

    /// Undoes the first Tab of the cycle, returning the input it started from.
    ///
    /// `None` once the cycle has moved past its first commit; the caller then
    /// retreats normally. After a rewind the next Tab commits the first
    /// candidate again.
    pub fn rewind(&mut self) -> Option<&str> {
        if !self.first_step {
            return None;
        }
        self.first_step = false;
        self.cursor = None;
        self.last_applied = Some(self.origin.trim().to_string());
        Some(&self.origin)
    }

    /// Remembers the text a commit produced so the next press continues the cycle.
    pub fn record_applied(&mut self, text: &str) {
        self.last_applied = Some(text.trim().to_string());
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Suggestion> {
        self.cursor.and_then(|i| self.candidates.get(i))
    }

    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn candidates(&self) -> &[Suggestion] {
        &self.candidates
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::engine::SuggestionKind;

    fn keys(names: &[&str]) -> Vec<Suggestion> {
        names
            .iter()
            .map(|n| Suggestion::new(*n, SuggestionKind::ChildKey, ""))
            .collect()
    }

    fn texts(state: &mut CompletionState, presses: usize) -> Vec<String> {
        (0..presses)
            .filter_map(|_| state.advance().map(|s| s.text.clone()))
            .collect()
    }

    #[test]
    fn tab_wraps_back_to_first() {
        let mut state = CompletionState::default();
        state.start("_".into(), "_.", keys(&["name", "items", "active"]));
        assert_eq!(texts(&mut state, 4), vec!["name", "items", "active", "name"]);
    }

    #[test]
    fn shift_tab_wraps_to_last() {
        let mut state = CompletionState::default();
        state.start("_".into(), "_.", keys(&["a", "b", "c"]));
        assert_eq!(state.retreat().map(|s| s.text.as_str()), Some("c"));
        assert_eq!(state.retreat().map(|s| s.text.as_str()), Some("b"));
    }

    #[test]
    fn tab_then_shift_tab_restores_selection() {
        let mut state = CompletionState::default();
        state.start("_".into(), "_.", keys(&["a", "b", "c"]));
        state.advance();
        state.advance();
        let before = state.clone();
        state.advance();
        state.retreat();
        assert_eq!(state, before);
    }

    #[test]
    fn rewind_only_after_first_tab() {
        let mut state = CompletionState::default();
        state.start("_".into(), "_.", keys(&["name", "items", "active"]));
        assert_eq!(state.rewind(), None);

        state.advance();
        assert_eq!(state.rewind(), Some("_."));
        assert_eq!(state.cursor(), None);
        assert!(state.continues("_."));
        assert_eq!(state.advance().map(|s| s.text.as_str()), Some("name"));

        state.advance();
        assert_eq!(state.rewind(), None);
        assert_eq!(state.retreat().map(|s| s.text.as_str()), Some("name"));
        assert_eq!(state.rewind(), None);
    }

    #[test]
    fn duplicates_are_removed_in_order() {
        let mut state = CompletionState::default();
        let mut candidates = keys(&["size", "a"]);
        candidates.push(Suggestion::new("size", SuggestionKind::GlobalFunction, "size(v)"));
        state.start("_".into(), "_.", candidates);
        let texts: Vec<_> = state.candidates().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["size", "a"]);
        assert_eq!(state.candidates()[0].kind, SuggestionKind::ChildKey);
    }

    #[test]
    fn empty_cycle_never_selects() {
        let mut state = CompletionState::default();
        state.start("_".into(), "_.", vec![]);
        assert!(state.advance().is_none());
        assert!(state.retreat().is_none());
        assert_eq!(state.cursor(), None);
        assert!(!state.continues("_"));
    }
}
