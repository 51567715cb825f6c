//! Value-to-text conversion and text layout shared by the views and the table.

use crate::domain::resolve;
use serde_json::Value;

/// Plain text for a value: strings unquoted, containers as compact JSON.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// One-line summary for the VALUE column.
#[must_use]
pub fn value_preview(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.len() {
            1 => "{…} 1 key".to_string(),
            n => format!("{{…}} {n} keys"),
        },
        Value::Array(items) => match items.len() {
            1 => "[…] 1 item".to_string(),
            n => format!("[…] {n} items"),
        },
        Value::String(s) => format!("\"{}\"", s.replace('\n', "⏎")),
        other => value_text(other),
    }
}

/// Text of `field` (a path relative to `node`), if present.
#[must_use]
pub fn field_text(node: &Value, field: &str) -> Option<String> {
    resolve(node, field).map(value_text)
}

/// Elements of an array field as text; a scalar field yields one element.
#[must_use]
pub fn field_list(node: &Value, field: &str) -> Vec<String> {
    match resolve(node, field) {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(Value::Null) | None => vec![],
        Some(other) => vec![value_text(other)],
    }
}

/// Cuts `text` to `width` characters, marking the cut with `…`.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Pads or truncates `text` to exactly `width` characters.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let len = cut.chars().count();
    format!("{cut}{}", " ".repeat(width.saturating_sub(len)))
}

/// Greedy word wrap to `width` characters; overlong words are split.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                lines.push(word.drain(..width).collect());
            }
            let word_len = word.len();
            if word_len == 0 {
                continue;
            }
            if line_len > 0 && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word);
            line_len += word_len;
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_and_preview() {
        assert_eq!(value_text(&json!("a")), "a");
        assert_eq!(value_text(&json!([1, 2])), "[1,2]");
        assert_eq!(value_preview(&json!({"a": 1, "b": 2})), "{…} 2 keys");
        assert_eq!(value_preview(&json!(["x"])), "[…] 1 item");
        assert_eq!(value_preview(&json!("hi")), "\"hi\"");
    }

    #[test]
    fn fields_resolve_relative_paths() {
        let node = json!({"owner": {"login": "octo"}, "tags": ["a", "b"], "lang": "rust"});
        assert_eq!(field_text(&node, "owner.login").as_deref(), Some("octo"));
        assert_eq!(field_list(&node, "tags"), vec!["a", "b"]);
        assert_eq!(field_list(&node, "lang"), vec!["rust"]);
        assert!(field_list(&node, "missing").is_empty());
    }

    #[test]
    fn wraps_and_truncates() {
        assert_eq!(wrap_text("the quick brown fox", 9), vec!["the quick", "brown fox"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 5), vec![""]);
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(fit("ab", 4), "ab  ");
    }
}
