//! Segment grammar and quote-aware scanning.
//!
//! A path is the root marker `_` followed by segments, each either
//! `.identifier`, `["quoted text"]` or `[N]`. Text inside quotes and brackets is
//! opaque to separator scanning: `_["a.b"]` has a single segment.

use super::ROOT;

/// One navigation step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Bare key written with dot notation (or as the leading token of a rootless path).
    Key(String),
    /// Key written inside a quoted bracket, `["..."]`.
    Quoted(String),
    /// Numeric bracket index, `[N]`.
    Index(usize),
}

impl Segment {
    /// Segment text with quoting removed; indices as decimal strings.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Key(k) | Self::Quoted(k) => k.clone(),
            Self::Index(i) => i.to_string(),
        }
    }
}

/// Returns `true` if `s` matches `[A-Za-z_][A-Za-z0-9_]*`.
#[must_use]
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns `true` for a non-empty string of ASCII digits.
#[must_use]
pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Removes the root marker from the front of a trimmed path.
///
/// Only a lone `_` followed by `.`, `[` or the end of input is the root; `__x`
/// and `_internal` are ordinary identifiers.
pub(crate) fn strip_root(path: &str) -> &str {
    if path == ROOT {
        return "";
    }
    match path.strip_prefix(ROOT) {
        Some(rest) if rest.starts_with('.') || rest.starts_with('[') => rest,
        _ => path,
    }
}

/// Parses a path into typed segments.
///
/// Never fails: an unterminated quote or bracket keeps whatever was read, and
/// empty dot segments (`a..b`, trailing `.`) are skipped.
#[must_use]
pub fn parse_segments(path: &str) -> Vec<Segment> {
    let body = strip_root(path.trim());
    let chars: Vec<char> = body.chars().collect();
    let mut segments = Vec::new();
    let mut bare = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '.' => {
                flush_bare(&mut bare, &mut segments);
                i += 1;
            }
            '[' => {
                flush_bare(&mut bare, &mut segments);
                i = parse_bracket(&chars, i + 1, &mut segments);
            }
            c => {
                bare.push(c);
                i += 1;
            }
        }
    }
    flush_bare(&mut bare, &mut segments);
    segments
}

fn flush_bare(bare: &mut String, segments: &mut Vec<Segment>) {
    if !bare.is_empty() {
        segments.push(Segment::Key(std::mem::take(bare)));
    }
}

/// Parses bracket content starting just after `[`; returns the index after `]`.
fn parse_bracket(chars: &[char], start: usize, segments: &mut Vec<Segment>) -> usize {
    let mut i = start;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }

    if i < chars.len() && (chars[i] == '"' || chars[i] == '\'') {
        let quote = chars[i];
        let mut key = String::new();
        i += 1;
        while i < chars.len() && chars[i] != quote {
            if chars[i] == '\\' && i + 1 < chars.len() {
                i += 1;
            }
            key.push(chars[i]);
            i += 1;
        }
        segments.push(Segment::Quoted(key));
        while i < chars.len() && chars[i] != ']' {
            i += 1;
        }
        return i + 1;
    }

    let mut content = String::new();
    while i < chars.len() && chars[i] != ']' {
        content.push(chars[i]);
        i += 1;
    }
    let content = content.trim();
    if let Ok(index) = content.parse::<usize>() {
        segments.push(Segment::Index(index));
    } else if !content.is_empty() {
        segments.push(Segment::Key(content.to_string()));
    }
    i + 1
}

/// Splits a path into segment strings: keys unquoted, indices as decimals.
///
/// Root-only or empty input yields an empty list.
#[must_use]
pub fn split_segments(path: &str) -> Vec<String> {
    parse_segments(path).iter().map(Segment::text).collect()
}

/// Byte offsets of separators that sit outside quotes and brackets.
///
/// Returns `(last_dot, last_open_bracket)`; a `[` is reported only when it
/// opens a bracket at nesting depth zero.
pub(crate) fn scan_separators(input: &str) -> (Option<usize>, Option<usize>) {
    let mut last_dot = None;
    let mut last_bracket = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0usize;

    for (idx, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' => {
                if depth == 0 {
                    last_bracket = Some(idx);
                }
                depth += 1;
            }
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => last_dot = Some(idx),
            _ => {}
        }
    }
    (last_dot, last_bracket)
}

/// Returns `true` when quotes and brackets are all closed.
pub(crate) fn is_balanced(input: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0i64;

    for c in input.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    quote.is_none() && depth == 0
}

/// Returns `true` if `input` contains expression syntax outside quotes and brackets.
///
/// Operators, calls and whitespace mark the text as an expression for the
/// external evaluator rather than an addressing path. `-` is allowed because
/// keys like `build-windows` are common in raw paths.
#[must_use]
pub fn is_expression(input: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0usize;

    for c in input.trim().chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            '(' | ')' | ',' | '!' | '=' | '<' | '>' | '+' | '*' | '/' | '%' | '&' | '|' | '?' | ':'
            | '{' | '}' => return true,
            c if c.is_whitespace() => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_grammar() {
        for ok in ["a", "_", "__x", "_internal", "A1_b2", "pd1001"] {
            assert!(is_valid_identifier(ok), "{ok} should be an identifier");
        }
        for bad in ["", "1a", "build-windows", "a.b", "a b", "é", "0"] {
            assert!(!is_valid_identifier(bad), "{bad} should not be an identifier");
        }
    }

    #[test]
    fn splits_dotted_and_bracketed_segments() {
        assert_eq!(split_segments("_.a.b"), vec!["a", "b"]);
        assert_eq!(split_segments("_.items[3].name"), vec!["items", "3", "name"]);
        assert_eq!(split_segments("tasks.build"), vec!["tasks", "build"]);
    }

    #[test]
    fn dots_inside_quotes_are_not_separators() {
        assert_eq!(split_segments("_[\"a.b\"].c"), vec!["a.b", "c"]);
        assert_eq!(split_segments("_.x[\"[weird].key\"]"), vec!["x", "[weird].key"]);
        assert_eq!(split_segments("_[\"say \\\"hi\\\"\"]"), vec!["say \"hi\""]);
    }

    #[test]
    fn root_only_is_empty() {
        assert!(split_segments("_").is_empty());
        assert!(split_segments("").is_empty());
        assert!(split_segments("   ").is_empty());
    }

    #[test]
    fn underscores_are_never_mistaken_for_root() {
        assert_eq!(split_segments("_internal.x"), vec!["_internal", "x"]);
        assert_eq!(split_segments("__x"), vec!["__x"]);
        assert_eq!(split_segments("_._"), vec!["_"]);
        assert_eq!(split_segments("_.__x._y"), vec!["__x", "_y"]);
    }

    #[test]
    fn typed_segments_distinguish_quoted_numbers() {
        assert_eq!(
            parse_segments("_.a[0][\"0\"].1"),
            vec![
                Segment::Key("a".into()),
                Segment::Index(0),
                Segment::Quoted("0".into()),
                Segment::Key("1".into()),
            ]
        );
    }

    #[test]
    fn scanning_ignores_quoted_separators() {
        let input = "_.a[\"x.y\"]";
        let (dot, bracket) = scan_separators(input);
        assert_eq!(dot, Some(1));
        assert_eq!(bracket, Some(3));
    }

    #[test]
    fn expression_detection() {
        assert!(is_expression("has(_.a)"));
        assert!(is_expression("_.a == 1"));
        assert!(!is_expression("_.tasks.build-windows"));
        assert!(!is_expression("_[\"a (b)\"]"));
    }

    #[test]
    fn balance_tracking() {
        assert!(is_balanced("_.a[\"x]\"]"));
        assert!(!is_balanced("_.a[\"x"));
        assert!(!is_balanced("_.a["));
        assert!(!is_balanced("has(_.a"));
    }
}
