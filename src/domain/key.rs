//! Host-agnostic key presses.
//!
//! The terminal host translates its native key events into [`Key`] values so the
//! application layer and the custom views never depend on a terminal backend.
//! Keys can also be parsed from the short identifiers used in schema action
//! bindings (`"y"`, `"ctrl+y"`, `"alt+w"`, `"f5"`, `"enter"`).

use std::fmt;
use std::str::FromStr;

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character without modifiers (shifted letters arrive uppercase).
    Char(char),
    /// Character pressed with Ctrl.
    Ctrl(char),
    /// Character pressed with Alt / Meta.
    Alt(char),
    /// Function key `F1`..`F12`.
    F(u8),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Esc,
    Tab,
    /// Shift+Tab.
    BackTab,
    Backspace,
    Delete,
}

impl Key {
    /// Returns `true` for the interrupt key (Ctrl+C), which quits in every mode.
    #[must_use]
    pub const fn is_interrupt(self) -> bool {
        matches!(self, Self::Ctrl('c'))
    }
}

/// Error returned when a key identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(pub String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key identifier: {}", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("ctrl+").or_else(|| lower.strip_prefix("c-")) {
            return single_char(rest).map(Self::Ctrl).ok_or_else(|| ParseKeyError(s.to_string()));
        }
        if let Some(rest) = lower
            .strip_prefix("alt+")
            .or_else(|| lower.strip_prefix("m-"))
            .or_else(|| lower.strip_prefix("meta+"))
        {
            return single_char(rest).map(Self::Alt).ok_or_else(|| ParseKeyError(s.to_string()));
        }

        let named = match lower.as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "home" => Some(Self::Home),
            "end" => Some(Self::End),
            "pgup" | "pageup" => Some(Self::PageUp),
            "pgdown" | "pagedown" => Some(Self::PageDown),
            "enter" | "return" => Some(Self::Enter),
            "esc" | "escape" => Some(Self::Esc),
            "tab" => Some(Self::Tab),
            "shift+tab" | "backtab" => Some(Self::BackTab),
            "backspace" => Some(Self::Backspace),
            "delete" | "del" => Some(Self::Delete),
            "space" => Some(Self::Char(' ')),
            _ => None,
        };
        if let Some(key) = named {
            return Ok(key);
        }

        if let Some(num) = lower.strip_prefix('f') {
            if let Ok(n) = num.parse::<u8>() {
                if (1..=12).contains(&n) {
                    return Ok(Self::F(n));
                }
            }
        }

        // Single characters keep their case: "G" and "g" are different keys.
        single_char(trimmed)
            .map(Self::Char)
            .ok_or_else(|| ParseKeyError(s.to_string()))
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(' ') => write!(f, "space"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Ctrl(c) => write!(f, "ctrl+{c}"),
            Self::Alt(c) => write!(f, "alt+{c}"),
            Self::F(n) => write!(f, "F{n}"),
            Self::Up => write!(f, "↑"),
            Self::Down => write!(f, "↓"),
            Self::Left => write!(f, "←"),
            Self::Right => write!(f, "→"),
            Self::Home => write!(f, "home"),
            Self::End => write!(f, "end"),
            Self::PageUp => write!(f, "pgup"),
            Self::PageDown => write!(f, "pgdn"),
            Self::Enter => write!(f, "enter"),
            Self::Esc => write!(f, "esc"),
            Self::Tab => write!(f, "tab"),
            Self::BackTab => write!(f, "shift+tab"),
            Self::Backspace => write!(f, "backspace"),
            Self::Delete => write!(f, "del"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifier_identifiers() {
        assert_eq!("ctrl+y".parse::<Key>(), Ok(Key::Ctrl('y')));
        assert_eq!("Alt+W".parse::<Key>(), Ok(Key::Alt('w')));
        assert_eq!("M-w".parse::<Key>(), Ok(Key::Alt('w')));
    }

    #[test]
    fn parses_named_and_function_keys() {
        assert_eq!("enter".parse::<Key>(), Ok(Key::Enter));
        assert_eq!("F5".parse::<Key>(), Ok(Key::F(5)));
        assert_eq!("esc".parse::<Key>(), Ok(Key::Esc));
        assert!("f13".parse::<Key>().is_err());
    }

    #[test]
    fn single_characters_keep_case() {
        assert_eq!("G".parse::<Key>(), Ok(Key::Char('G')));
        assert_eq!("g".parse::<Key>(), Ok(Key::Char('g')));
        assert!("gg".parse::<Key>().is_err());
    }

    #[test]
    fn interrupt_is_ctrl_c_only() {
        assert!(Key::Ctrl('c').is_interrupt());
        assert!(!Key::Char('c').is_interrupt());
    }
}
