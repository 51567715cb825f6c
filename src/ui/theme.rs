//! Theme management and ANSI escape sequence generation.
//!
//! Themes are TOML color palettes. Three are built in and a user file can
//! replace them. Whether color is emitted at all is decided separately (by
//! `--no-color` or `NO_COLOR`) and travels with the
//! [`RenderContext`](crate::ui::RenderContext), never inside the theme.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `plain`: Terminal default colors, emphasis through bold and dim only
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! key_fg = "#89b4fa"
//! string_fg = "#a6e3a1"
//! number_fg = "#fab387"
//! literal_fg = "#cba6f7"
//! success_fg = "#a6e3a1"
//! error_fg = "#f38ba8"
//! pending_fg = "#f9e2af"
//! ```

use crate::domain::{NestviewError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Names accepted by [`Theme::from_name`].
pub const BUILTIN_THEMES: [&str; 3] = ["catppuccin-mocha", "catppuccin-latte", "plain"];

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Colors for all UI elements, as hex strings (`"#cdd6f4"`).
///
/// An empty string means "terminal default" and produces no escape sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, hints and secondary fields.
    pub text_dim: String,

    pub border: String,

    /// Expression bar frame.
    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// KEY column and field labels.
    pub key_fg: String,
    pub string_fg: String,
    pub number_fg: String,
    /// Booleans and null.
    pub literal_fg: String,

    pub success_fg: String,
    pub error_fg: String,
    /// Spinner and other in-progress markers.
    pub pending_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name; `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "plain" => include_str!("../../themes/plain.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`NestviewError::Theme`] if the file cannot be read or its
    /// content is not a complete theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| NestviewError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents).map_err(|e| NestviewError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Parses `#rrggbb` (the `#` is optional); `None` for anything else.
    fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }

    /// 24-bit foreground escape (`\x1b[38;2;r;g;bm`); empty for invalid colors.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        Self::hex_to_rgb(hex).map_or_else(String::new, |(r, g, b)| format!("\u{001b}[38;2;{r};{g};{b}m"))
    }

    /// 24-bit background escape (`\x1b[48;2;r;g;bm`); empty for invalid colors.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        Self::hex_to_rgb(hex).map_or_else(String::new, |(r, g, b)| format!("\u{001b}[48;2;{r};{g};{b}m"))
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reverse() -> &'static str {
        "\u{001b}[7m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    ///
    /// # Panics
    ///
    /// Panics if the built-in theme fails to parse (should never occur).
    fn default() -> Self {
        Self::from_name("catppuccin-mocha").expect("Built-in catppuccin-mocha theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_parse() {
        for name in BUILTIN_THEMES {
            let theme = Theme::from_name(name).unwrap_or_else(|| panic!("{name} should parse"));
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn hex_conversion() {
        assert_eq!(Theme::fg("#010203"), "\u{1b}[38;2;1;2;3m");
        assert_eq!(Theme::bg("ff0000"), "\u{1b}[48;2;255;0;0m");
        assert_eq!(Theme::fg(""), "");
        assert_eq!(Theme::fg("#zzzzzz"), "");
    }

    #[test]
    fn theme_file_errors_are_theme_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "name = \"x\"\n").unwrap();
        assert!(matches!(Theme::from_file(&path), Err(NestviewError::Theme(_))));
        assert!(matches!(Theme::from_file(dir.path().join("none.toml")), Err(NestviewError::Theme(_))));
    }
}
