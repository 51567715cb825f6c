//! Detail view: one record laid out in titled sections.
//!
//! Text is wrapped eagerly for the current width and re-wrapped on
//! [`ViewEvent::Resize`]. Fields not claimed by any section (and not hidden)
//! are collected under a trailing "Other" section.

use super::format::{fit, truncate, value_preview, value_text, wrap_text};
use super::{Position, ViewCommand, ViewEvent};
use crate::domain::{resolve, Key, KeyMode, LogicalAction};
use crate::path::{split_segments, strip_last_segment, ROOT};
use crate::schema::{DetailConfig, SectionLayout};
use crate::ui::RenderContext;
use serde_json::Value;

const DEFAULT_WIDTH: usize = 80;
const DEFAULT_HEIGHT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    title: String,
    layout: SectionLayout,
    /// `(label, value)` pairs in display order.
    fields: Vec<(String, Value)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Heading(String),
    Field { label: String, value: String },
    Text(String),
    Blank,
}

#[derive(Debug, Clone)]
pub struct DetailView {
    title: String,
    path: String,
    sections: Vec<Section>,
    lines: Vec<Line>,
    scroll: usize,
    width: usize,
    height: usize,
    key_mode: KeyMode,
}

fn field_label(field: &str) -> String {
    split_segments(field).pop().unwrap_or_else(|| field.to_string())
}

impl DetailView {
    #[must_use]
    pub fn new(config: &DetailConfig, node: &Value, path: &str, key_mode: KeyMode) -> Self {
        let mut sections: Vec<Section> = config
            .sections
            .iter()
            .map(|section| Section {
                title: section.title.clone(),
                layout: section.layout,
                fields: section
                    .fields
                    .iter()
                    .filter_map(|f| resolve(node, f).map(|v| (field_label(f), v.clone())))
                    .collect(),
            })
            .collect();

        let claimed: Vec<String> = config
            .sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .chain(config.hidden_fields.iter())
            .chain(config.title_field.iter())
            .filter_map(|f| split_segments(f).into_iter().next())
            .collect();
        if let Value::Object(map) = node {
            let other: Vec<(String, Value)> = map
                .iter()
                .filter(|(k, _)| !claimed.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if !other.is_empty() {
                sections.push(Section {
                    title: "Other".to_string(),
                    layout: SectionLayout::Inline,
                    fields: other,
                });
            }
        }

        let title = config
            .title_field
            .as_deref()
            .and_then(|f| resolve(node, f))
            .map(value_text)
            .or_else(|| split_segments(path).pop())
            .unwrap_or_else(|| "Details".to_string());

        let mut view = Self {
            title,
            path: path.to_string(),
            sections,
            lines: vec![],
            scroll: 0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            key_mode,
        };
        view.layout();
        view
    }

    fn layout(&mut self) {
        let width = self.width.max(10);
        let mut lines = Vec::new();

        for section in self.sections.iter().filter(|s| !s.fields.is_empty()) {
            if !lines.is_empty() {
                lines.push(Line::Blank);
            }
            lines.push(Line::Heading(section.title.clone()));

            match section.layout {
                SectionLayout::Inline => {
                    for (label, value) in &section.fields {
                        let value = match value {
                            Value::Array(_) | Value::Object(_) => value_preview(value),
                            other => value_text(other),
                        };
                        lines.push(Line::Field {
                            label: label.clone(),
                            value,
                        });
                    }
                }
                SectionLayout::Paragraph => {
                    for (_, value) in &section.fields {
                        lines.extend(wrap_text(&value_text(value), width - 2).into_iter().map(Line::Text));
                    }
                }
                SectionLayout::Tags => {
                    let tags: Vec<String> = section
                        .fields
                        .iter()
                        .flat_map(|(_, v)| match v {
                            Value::Array(items) => items.iter().map(value_text).collect(),
                            other => vec![value_text(other)],
                        })
                        .map(|t| format!("[{t}]"))
                        .collect();
                    lines.extend(wrap_text(&tags.join(" "), width - 2).into_iter().map(Line::Text));
                }
                SectionLayout::Table => {
                    let label_width = section.fields.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
                    for (label, value) in &section.fields {
                        let value = match value {
                            Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
                            other => value_text(other),
                        };
                        lines.push(Line::Text(format!("{}  {value}", fit(label, label_width))));
                    }
                }
            }
        }

        if lines.is_empty() {
            lines.push(Line::Text("(empty)".to_string()));
        }
        self.lines = lines;
        self.clamp_scroll();
    }

    const fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.clone()
    }

    #[must_use]
    pub fn footer(&self) -> String {
        let m = self.key_mode;
        format!(
            "{}/{}: scroll  {}: back  {}: quit",
            m.hint(LogicalAction::Up),
            m.hint(LogicalAction::Down),
            m.hint(LogicalAction::Back),
            m.hint(LogicalAction::Quit),
        )
    }

    #[must_use]
    pub fn position(&self) -> Position {
        (self.lines.len(), self.scroll + 1, "lines".to_string())
    }

    #[must_use]
    pub fn update(mut self, event: ViewEvent) -> (Self, Option<ViewCommand>) {
        let key = match event {
            ViewEvent::Key(key) => key,
            ViewEvent::Resize { width, height } => {
                self.width = width;
                self.height = height.max(1);
                self.layout();
                return (self, None);
            }
            _ => return (self, None),
        };

        let page = self.height.saturating_sub(1).max(1);
        let command = match (key, self.key_mode.resolve(key)) {
            (_, Some(LogicalAction::Up)) => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            (_, Some(LogicalAction::Down)) => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
                None
            }
            (Key::PageUp, _) => {
                self.scroll = self.scroll.saturating_sub(page);
                None
            }
            (Key::PageDown, _) => {
                self.scroll = (self.scroll + page).min(self.max_scroll());
                None
            }
            (_, Some(LogicalAction::Top)) => {
                self.scroll = 0;
                None
            }
            (_, Some(LogicalAction::Bottom)) => {
                self.scroll = self.max_scroll();
                None
            }
            (_, Some(LogicalAction::Back)) if self.path != ROOT => {
                Some(ViewCommand::Navigate(strip_last_segment(&self.path)))
            }
            (_, Some(LogicalAction::Quit)) => Some(ViewCommand::Quit),
            _ => None,
        };
        (self, command)
    }

    #[must_use]
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let colors = ctx.colors();
        let width = ctx.width.max(10);
        self.lines
            .iter()
            .skip(self.scroll)
            .take(ctx.height.max(1))
            .map(|line| match line {
                Line::Heading(title) => format!("{}{}{title}{}", ctx.bold(), ctx.fg(&colors.header_fg), ctx.reset()),
                Line::Field { label, value } => {
                    let value = truncate(value, width.saturating_sub(label.chars().count() + 4));
                    format!("  {}: {value}", ctx.paint(&colors.key_fg, label))
                }
                Line::Text(text) => format!("  {}", truncate(text, width - 2)),
                Line::Blank => String::new(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DetailSection;
    use crate::ui::Theme;
    use serde_json::json;

    fn node() -> Value {
        json!({
            "name": "nestview",
            "owner": {"login": "octo"},
            "description": "A terminal browser for nested data documents",
            "topics": ["tui", "json"],
            "stars": 42,
            "internal_id": "x1"
        })
    }

    fn config() -> DetailConfig {
        DetailConfig {
            title_field: Some("name".into()),
            sections: vec![
                DetailSection {
                    title: "About".into(),
                    fields: vec!["owner.login".into(), "stars".into()],
                    layout: SectionLayout::Inline,
                },
                DetailSection {
                    title: "Description".into(),
                    fields: vec!["description".into()],
                    layout: SectionLayout::Paragraph,
                },
                DetailSection {
                    title: "Topics".into(),
                    fields: vec!["topics".into()],
                    layout: SectionLayout::Tags,
                },
            ],
            hidden_fields: vec!["internal_id".into()],
        }
    }

    fn plain(view: &DetailView, width: usize, height: usize) -> String {
        let theme = Theme::default();
        view.render(&RenderContext::new(&theme, width, height).with_color(false))
    }

    #[test]
    fn lays_out_sections() {
        let view = DetailView::new(&config(), &node(), "_.repo", KeyMode::Vim);
        assert_eq!(view.title(), "nestview");
        let out = plain(&view, 80, 40);
        assert!(out.contains("About\n  login: octo\n  stars: 42"));
        assert!(out.contains("  [tui] [json]"));
        assert!(!out.contains("internal_id"));
        // every field is claimed, so there is no Other section
        assert!(!out.contains("Other"));
    }

    #[test]
    fn unclaimed_fields_go_to_other() {
        let config = DetailConfig::default();
        let view = DetailView::new(&config, &json!({"a": 1, "b": [1, 2]}), "_", KeyMode::Vim);
        let out = plain(&view, 80, 40);
        assert_eq!(out, "Other\n  a: 1\n  b: […] 2 items");
    }

    #[test]
    fn resize_rewraps_paragraphs() {
        let view = DetailView::new(&config(), &node(), "_.repo", KeyMode::Vim);
        let before = view.position().0;
        let (view, cmd) = view.update(ViewEvent::Resize { width: 20, height: 5 });
        assert_eq!(cmd, None);
        assert!(view.position().0 > before);
    }

    #[test]
    fn scrolling_is_clamped() {
        let view = DetailView::new(&config(), &node(), "_.repo", KeyMode::Vim);
        let (view, _) = view.update(ViewEvent::Resize { width: 80, height: 3 });
        let (view, _) = view.update(ViewEvent::Key(Key::Char('G')));
        let bottom = view.position().1;
        let (view, _) = view.update(ViewEvent::Key(Key::Char('j')));
        assert_eq!(view.position().1, bottom);
        let (view, _) = view.update(ViewEvent::Key(Key::Char('g')));
        assert_eq!(view.position().1, 1);
    }

    #[test]
    fn back_and_quit() {
        let view = DetailView::new(&config(), &node(), "_.repo", KeyMode::Emacs);
        let (view, cmd) = view.update(ViewEvent::Key(Key::Ctrl('b')));
        assert_eq!(cmd, Some(ViewCommand::Navigate("_".into())));
        let (_, cmd) = view.update(ViewEvent::Key(Key::Ctrl('x')));
        assert_eq!(cmd, Some(ViewCommand::Quit));
    }
}
