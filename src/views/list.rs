//! List view: an array (or map) of records, one block per record.
//!
//! Each record shows a title with packed badges, a wrapped subtitle and a line
//! of secondary fields. The view owns its filter mode: typing narrows the
//! list with fuzzy matching on title and subtitle.

use super::format::{field_list, field_text, truncate, wrap_text};
use super::{Position, ViewCommand, ViewEvent};
use crate::domain::{Key, KeyMode, LogicalAction};
use crate::path::{build_child_path, build_index_path, split_segments, strip_last_segment, ROOT};
use crate::schema::{ListConfig, ViewSchema};
use crate::ui::RenderContext;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub title: String,
    pub subtitle: Option<String>,
    pub badges: Vec<String>,
    pub secondary: Vec<(String, String)>,
    /// Path of the record, used when the item is opened.
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct ListView {
    heading: String,
    path: String,
    items: Vec<ListItem>,
    /// Indices into `items` that pass the filter.
    visible: Vec<usize>,
    selected: usize,
    filter: String,
    filtering: bool,
    key_mode: KeyMode,
    max_subtitle_lines: usize,
}

impl ListView {
    #[must_use]
    pub fn new(schema: &ViewSchema, config: &ListConfig, node: &Value, path: &str, key_mode: KeyMode) -> Self {
        let entries: Vec<(String, String, &Value)> = match node {
            Value::Array(values) => values
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), build_index_path(path, i), v))
                .collect(),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), build_child_path(path, k), v))
                .collect(),
            _ => vec![],
        };

        let items: Vec<ListItem> = entries
            .into_iter()
            .map(|(label, item_path, record)| ListItem {
                title: field_text(record, &config.title_field).unwrap_or(label),
                subtitle: config.subtitle_field.as_deref().and_then(|f| field_text(record, f)),
                badges: config.badge_fields.iter().flat_map(|f| field_list(record, f)).collect(),
                secondary: config
                    .secondary_fields
                    .iter()
                    .filter_map(|f| field_text(record, f).map(|v| (f.clone(), v)))
                    .collect(),
                path: item_path,
            })
            .collect();

        let base_title = schema
            .title
            .clone()
            .or_else(|| split_segments(path).pop())
            .unwrap_or_else(|| "Items".to_string());
        let heading = match &schema.icon {
            Some(icon) => format!("{icon} {base_title}"),
            None => base_title,
        };

        let mut view = Self {
            heading,
            path: path.to_string(),
            visible: (0..items.len()).collect(),
            items,
            selected: 0,
            filter: String::new(),
            filtering: false,
            key_mode,
            max_subtitle_lines: config.max_subtitle_lines,
        };
        view.apply_filter();
        view
    }

    /// Recomputes visible items from the filter and clamps the selection.
    fn apply_filter(&mut self) {
        let _span = tracing::trace_span!("list_filter", total = self.items.len(), query_len = self.filter.len()).entered();

        let tokens: Vec<String> = self.filter.split_whitespace().map(str::to_lowercase).collect();
        let matcher = SkimMatcherV2::default();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                if tokens.is_empty() {
                    return true;
                }
                let haystack = format!("{} {}", item.title, item.subtitle.as_deref().unwrap_or_default()).to_lowercase();
                tokens.iter().all(|token| matcher.fuzzy_match(&haystack, token).is_some())
            })
            .map(|(i, _)| i)
            .collect();

        self.selected = if self.visible.is_empty() {
            0
        } else {
            self.selected.min(self.visible.len() - 1)
        };
    }

    fn move_down(&mut self) {
        if !self.visible.is_empty() {
            self.selected = (self.selected + 1) % self.visible.len();
        }
    }

    fn move_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.visible.len() - 1
        } else {
            self.selected - 1
        };
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&ListItem> {
        self.visible.get(self.selected).and_then(|&i| self.items.get(i))
    }

    #[must_use]
    pub const fn is_filtering(&self) -> bool {
        self.filtering
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.heading.clone()
    }

    #[must_use]
    pub fn footer(&self) -> String {
        if self.filtering {
            return "type to filter  enter: done  esc: clear".to_string();
        }
        let m = self.key_mode;
        format!(
            "{}/{}: move  enter: open  {}: filter  {}: back  {}: quit",
            m.hint(LogicalAction::Up),
            m.hint(LogicalAction::Down),
            m.hint(LogicalAction::Search),
            m.hint(LogicalAction::Back),
            m.hint(LogicalAction::Quit),
        )
    }

    #[must_use]
    pub const fn consumes_search(&self) -> bool {
        true
    }

    #[must_use]
    pub fn search_title(&self) -> Option<String> {
        Some("Filter".to_string())
    }

    #[must_use]
    pub fn position(&self) -> Position {
        let selected = if self.visible.is_empty() { 0 } else { self.selected + 1 };
        (self.visible.len(), selected, "items".to_string())
    }

    #[must_use]
    pub fn update(mut self, event: ViewEvent) -> (Self, Option<ViewCommand>) {
        let ViewEvent::Key(key) = event else {
            return (self, None);
        };

        if self.filtering {
            match key {
                Key::Ctrl('c') => return (self, Some(ViewCommand::Quit)),
                Key::Esc => {
                    self.filtering = false;
                    self.filter.clear();
                    self.apply_filter();
                }
                Key::Enter => self.filtering = false,
                Key::Backspace => {
                    self.filter.pop();
                    self.apply_filter();
                }
                Key::Char(c) => {
                    self.filter.push(c);
                    self.apply_filter();
                }
                Key::Up => self.move_up(),
                Key::Down => self.move_down(),
                _ => {}
            }
            return (self, None);
        }

        let command = match self.key_mode.resolve(key) {
            Some(LogicalAction::Up) => {
                self.move_up();
                None
            }
            Some(LogicalAction::Down) => {
                self.move_down();
                None
            }
            Some(LogicalAction::Top) => {
                self.selected = 0;
                None
            }
            Some(LogicalAction::Bottom) => {
                self.selected = self.visible.len().saturating_sub(1);
                None
            }
            Some(LogicalAction::Search) => {
                self.filtering = true;
                None
            }
            Some(LogicalAction::Enter | LogicalAction::Forward) => {
                self.selected_item().map(|item| ViewCommand::Navigate(item.path.clone()))
            }
            Some(LogicalAction::Back) if self.path != ROOT => {
                Some(ViewCommand::Navigate(strip_last_segment(&self.path)))
            }
            Some(LogicalAction::Quit) => Some(ViewCommand::Quit),
            _ if key == Key::Esc && !self.filter.is_empty() => {
                self.filter.clear();
                self.apply_filter();
                None
            }
            _ => None,
        };
        (self, command)
    }

    fn item_lines(&self, item: &ListItem, selected: bool, ctx: &RenderContext<'_>) -> Vec<String> {
        let width = ctx.width.max(8);
        let colors = ctx.colors();
        let mut lines = Vec::new();

        let badges: String = item.badges.iter().map(|b| format!(" [{b}]")).collect();
        let marker = if selected { "› " } else { "  " };
        let head = truncate(&format!("{marker}{}{badges}", item.title), width);
        lines.push(if selected {
            ctx.selected(&head)
        } else {
            format!("{}{head}{}", ctx.fg(&colors.text_normal), ctx.reset())
        });

        if let Some(subtitle) = &item.subtitle {
            let wrapped = wrap_text(subtitle, width.saturating_sub(4));
            let shown = wrapped.len().min(self.max_subtitle_lines);
            for (i, line) in wrapped.iter().take(shown).enumerate() {
                let line = if i + 1 == shown && wrapped.len() > shown {
                    format!("{}…", truncate(line, width.saturating_sub(5)))
                } else {
                    line.clone()
                };
                lines.push(format!("    {}", ctx.paint(&colors.string_fg, &line)));
            }
        }

        if !item.secondary.is_empty() {
            let pairs: Vec<String> = item.secondary.iter().map(|(k, v)| format!("{k}: {v}")).collect();
            lines.push(format!("    {}", ctx.muted(&truncate(&pairs.join("  "), width.saturating_sub(4)))));
        }
        lines
    }

    #[must_use]
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out: Vec<String> = Vec::new();
        if self.filtering || !self.filter.is_empty() {
            let cursor = if self.filtering { "▏" } else { "" };
            out.push(format!("{}Filter:{} {}{cursor}", ctx.bold(), ctx.reset(), self.filter));
        }

        if self.visible.is_empty() {
            let message = if self.items.is_empty() { "No items" } else { "No matching items" };
            out.push(ctx.paint(&ctx.colors().empty_state_fg, message));
            return out.join("\n");
        }

        let budget = ctx.height.saturating_sub(out.len()).max(1);
        let blocks: Vec<Vec<String>> = self
            .visible
            .iter()
            .enumerate()
            .map(|(pos, &i)| self.item_lines(&self.items[i], pos == self.selected, ctx))
            .collect();

        let mut start = 0;
        while start < self.selected && blocks[start..=self.selected].iter().map(Vec::len).sum::<usize>() > budget {
            start += 1;
        }

        let mut used = 0;
        for block in &blocks[start..] {
            if used + block.len() > budget && used > 0 {
                break;
            }
            used += block.len();
            out.extend(block.iter().cloned());
        }
        out.truncate(ctx.height.max(1));
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Theme;
    use serde_json::json;

    fn config() -> ListConfig {
        ListConfig {
            title_field: "name".into(),
            subtitle_field: Some("description".into()),
            max_subtitle_lines: 1,
            badge_fields: vec!["lang".into()],
            secondary_fields: vec!["stars".into()],
        }
    }

    fn view() -> ListView {
        let node = json!([
            {"name": "nestview", "description": "Browse nested data", "lang": "rust", "stars": 10},
            {"name": "blueline", "description": "HTTP client", "lang": "rust", "stars": 5},
            {"name": "websh", "description": "Web shell", "lang": "ts"}
        ]);
        ListView::new(&ViewSchema::default(), &config(), &node, "_.repos", KeyMode::Vim)
    }

    fn press(view: ListView, key: Key) -> (ListView, Option<ViewCommand>) {
        view.update(ViewEvent::Key(key))
    }

    #[test]
    fn builds_items_from_fields() {
        let v = view();
        assert_eq!(v.title(), "repos");
        let first = v.selected_item().unwrap();
        assert_eq!(first.badges, vec!["rust"]);
        assert_eq!(first.secondary, vec![("stars".to_string(), "10".to_string())]);
        assert_eq!(first.path, "_.repos[0]");
        assert_eq!(v.position(), (3, 1, "items".to_string()));
    }

    #[test]
    fn selection_wraps() {
        let (v, _) = press(view(), Key::Char('k'));
        assert_eq!(v.position().1, 3);
        let (v, _) = press(v, Key::Down);
        assert_eq!(v.position().1, 1);
    }

    #[test]
    fn enter_navigates_to_record() {
        let (v, _) = press(view(), Key::Char('j'));
        let (_, cmd) = press(v, Key::Enter);
        assert_eq!(cmd, Some(ViewCommand::Navigate("_.repos[1]".into())));
    }

    #[test]
    fn back_navigates_to_parent() {
        let (_, cmd) = press(view(), Key::Char('h'));
        assert_eq!(cmd, Some(ViewCommand::Navigate("_".into())));
    }

    #[test]
    fn filter_mode_consumes_keys() {
        let mut v = view();
        for key in [Key::Char('/'), Key::Char('w'), Key::Char('e'), Key::Char('b')] {
            v = press(v, key).0;
        }
        assert!(v.is_filtering());
        assert_eq!(v.position().0, 1);
        assert_eq!(v.selected_item().unwrap().title, "websh");

        // 'q' is text while filtering, not quit
        let (v, cmd) = press(v, Key::Char('q'));
        assert_eq!(cmd, None);
        let (v, _) = press(v, Key::Esc);
        assert!(!v.is_filtering());
        assert_eq!(v.position().0, 3);
    }

    #[test]
    fn quit_key_quits() {
        let (_, cmd) = press(view(), Key::Char('q'));
        assert_eq!(cmd, Some(ViewCommand::Quit));
    }

    #[test]
    fn renders_without_color() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, 40, 10).with_color(false);
        let out = view().render(&ctx);
        assert!(out.starts_with("› nestview [rust]"));
        assert!(out.contains("    Browse nested data"));
        assert!(out.contains("stars: 10"));
        assert!(!out.contains('\u{1b}'));
    }
}
