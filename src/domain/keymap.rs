//! Key modes mapping physical keys to logical actions.
//!
//! Every mode binds the same logical actions to its own keys. Arrows, Home,
//! End, Ctrl-C and F1 behave the same in all modes.
//!
//! | Action   | vim   | emacs  | function |
//! |----------|-------|--------|----------|
//! | up       | k     | C-p    | F7       |
//! | down     | j     | C-n    | F8       |
//! | back     | h     | C-b    | F3       |
//! | forward  | l     | C-f    | F4       |
//! | enter    | Enter | C-j    | F9       |
//! | quit     | q     | C-x    | F10      |
//! | help     | ?     | M-h    | F1       |
//! | top      | g     | M-<    | F5       |
//! | bottom   | G     | M->    | F6       |
//! | search   | /     | C-s    | F2       |
//! | copy     | y     | M-w    | F11      |

use super::key::Key;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key binding scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    #[default]
    Vim,
    Emacs,
    Function,
}

/// Mode-independent action a key press stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalAction {
    Up,
    Down,
    Back,
    Forward,
    Enter,
    Quit,
    Help,
    Top,
    Bottom,
    Search,
    /// Copies the current path to the clipboard.
    CopyPath,
}

impl LogicalAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Back => "back",
            Self::Forward => "open",
            Self::Enter => "select",
            Self::Quit => "quit",
            Self::Help => "help",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Search => "search",
            Self::CopyPath => "copy path",
        }
    }
}

const fn universal(key: Key) -> Option<LogicalAction> {
    match key {
        Key::Up => Some(LogicalAction::Up),
        Key::Down => Some(LogicalAction::Down),
        Key::Left => Some(LogicalAction::Back),
        Key::Right => Some(LogicalAction::Forward),
        Key::Home => Some(LogicalAction::Top),
        Key::End => Some(LogicalAction::Bottom),
        Key::Enter => Some(LogicalAction::Enter),
        Key::Ctrl('c') => Some(LogicalAction::Quit),
        Key::F(1) => Some(LogicalAction::Help),
        _ => None,
    }
}

impl KeyMode {
    pub const ALL: [Self; 3] = [Self::Vim, Self::Emacs, Self::Function];

    /// Resolves a key press to its logical action in this mode.
    #[must_use]
    pub fn resolve(self, key: Key) -> Option<LogicalAction> {
        if let Some(action) = universal(key) {
            return Some(action);
        }
        let action = match (self, key) {
            (Self::Vim, Key::Char('k')) | (Self::Emacs, Key::Ctrl('p')) | (Self::Function, Key::F(7)) => {
                LogicalAction::Up
            }
            (Self::Vim, Key::Char('j')) | (Self::Emacs, Key::Ctrl('n')) | (Self::Function, Key::F(8)) => {
                LogicalAction::Down
            }
            (Self::Vim, Key::Char('h')) | (Self::Emacs, Key::Ctrl('b')) | (Self::Function, Key::F(3)) => {
                LogicalAction::Back
            }
            (Self::Vim, Key::Char('l')) | (Self::Emacs, Key::Ctrl('f')) | (Self::Function, Key::F(4)) => {
                LogicalAction::Forward
            }
            (Self::Emacs, Key::Ctrl('j')) | (Self::Function, Key::F(9)) => LogicalAction::Enter,
            (Self::Vim, Key::Char('q')) | (Self::Emacs, Key::Ctrl('x')) | (Self::Function, Key::F(10)) => {
                LogicalAction::Quit
            }
            (Self::Vim, Key::Char('?')) | (Self::Emacs, Key::Alt('h')) => LogicalAction::Help,
            (Self::Vim, Key::Char('g')) | (Self::Emacs, Key::Alt('<')) | (Self::Function, Key::F(5)) => {
                LogicalAction::Top
            }
            (Self::Vim, Key::Char('G')) | (Self::Emacs, Key::Alt('>')) | (Self::Function, Key::F(6)) => {
                LogicalAction::Bottom
            }
            (Self::Vim, Key::Char('/')) | (Self::Emacs, Key::Ctrl('s')) | (Self::Function, Key::F(2)) => {
                LogicalAction::Search
            }
            (Self::Vim, Key::Char('y')) | (Self::Emacs, Key::Alt('w')) | (Self::Function, Key::F(11)) => {
                LogicalAction::CopyPath
            }
            _ => return None,
        };
        Some(action)
    }

    /// Primary key bound to `action`, used for hints.
    #[must_use]
    pub const fn binding(self, action: LogicalAction) -> Key {
        use LogicalAction as A;
        match (self, action) {
            (_, A::Enter) => Key::Enter,
            (Self::Vim, A::Up) => Key::Char('k'),
            (Self::Vim, A::Down) => Key::Char('j'),
            (Self::Vim, A::Back) => Key::Char('h'),
            (Self::Vim, A::Forward) => Key::Char('l'),
            (Self::Vim, A::Quit) => Key::Char('q'),
            (Self::Vim, A::Help) => Key::Char('?'),
            (Self::Vim, A::Top) => Key::Char('g'),
            (Self::Vim, A::Bottom) => Key::Char('G'),
            (Self::Vim, A::Search) => Key::Char('/'),
            (Self::Vim, A::CopyPath) => Key::Char('y'),
            (Self::Emacs, A::Up) => Key::Ctrl('p'),
            (Self::Emacs, A::Down) => Key::Ctrl('n'),
            (Self::Emacs, A::Back) => Key::Ctrl('b'),
            (Self::Emacs, A::Forward) => Key::Ctrl('f'),
            (Self::Emacs, A::Quit) => Key::Ctrl('x'),
            (Self::Emacs, A::Help) => Key::Alt('h'),
            (Self::Emacs, A::Top) => Key::Alt('<'),
            (Self::Emacs, A::Bottom) => Key::Alt('>'),
            (Self::Emacs, A::Search) => Key::Ctrl('s'),
            (Self::Emacs, A::CopyPath) => Key::Alt('w'),
            (Self::Function, A::Up) => Key::F(7),
            (Self::Function, A::Down) => Key::F(8),
            (Self::Function, A::Back) => Key::F(3),
            (Self::Function, A::Forward) => Key::F(4),
            (Self::Function, A::Quit) => Key::F(10),
            (Self::Function, A::Help) => Key::F(1),
            (Self::Function, A::Top) => Key::F(5),
            (Self::Function, A::Bottom) => Key::F(6),
            (Self::Function, A::Search) => Key::F(2),
            (Self::Function, A::CopyPath) => Key::F(11),
        }
    }

    /// `"j/↓"`-style hint: the mode key and, where different, its universal alias.
    #[must_use]
    pub fn hint(self, action: LogicalAction) -> String {
        let primary = self.binding(action);
        let alias = match action {
            LogicalAction::Up => Some(Key::Up),
            LogicalAction::Down => Some(Key::Down),
            LogicalAction::Back => Some(Key::Left),
            LogicalAction::Forward => Some(Key::Right),
            _ => None,
        };
        match alias {
            Some(alias) if alias != primary => format!("{primary}/{alias}"),
            _ => primary.to_string(),
        }
    }

    /// Returns `true` if `key` requests termination in this mode.
    #[must_use]
    pub fn is_quit(self, key: Key) -> bool {
        self.resolve(key) == Some(LogicalAction::Quit)
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vim => "vim",
            Self::Emacs => "emacs",
            Self::Function => "function",
        })
    }
}

impl FromStr for KeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vim" => Ok(Self::Vim),
            "emacs" => Ok(Self::Emacs),
            "function" | "fn" => Ok(Self::Function),
            other => Err(format!("unknown key mode '{other}' (expected vim, emacs or function)")),
        }
    }
}
