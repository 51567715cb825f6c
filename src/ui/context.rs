//! Per-frame rendering context.
//!
//! Carries the viewport, theme, color flag and key mode into every render
//! call. Styling helpers return empty strings when color is disabled, so
//! renderers can style unconditionally.

use crate::domain::KeyMode;
use crate::ui::theme::{Theme, ThemeColors};

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub width: usize,
    pub height: usize,
    pub color: bool,
    pub theme: &'a Theme,
    pub key_mode: KeyMode,
}

impl<'a> RenderContext<'a> {
    #[must_use]
    pub const fn new(theme: &'a Theme, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color: true,
            theme,
            key_mode: KeyMode::Vim,
        }
    }

    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub const fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    /// Same context restricted to a smaller area.
    #[must_use]
    pub const fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub const fn colors(&self) -> &ThemeColors {
        &self.theme.colors
    }

    #[must_use]
    pub fn fg(&self, hex: &str) -> String {
        if self.color {
            Theme::fg(hex)
        } else {
            String::new()
        }
    }

    #[must_use]
    pub fn bg(&self, hex: &str) -> String {
        if self.color {
            Theme::bg(hex)
        } else {
            String::new()
        }
    }

    #[must_use]
    pub const fn bold(&self) -> &'static str {
        if self.color {
            Theme::bold()
        } else {
            ""
        }
    }

    #[must_use]
    pub const fn dim(&self) -> &'static str {
        if self.color {
            Theme::dim()
        } else {
            ""
        }
    }

    #[must_use]
    pub const fn reset(&self) -> &'static str {
        if self.color {
            Theme::reset()
        } else {
            ""
        }
    }

    /// `text` in the foreground color `hex`.
    #[must_use]
    pub fn paint(&self, hex: &str, text: &str) -> String {
        let fg = self.fg(hex);
        if fg.is_empty() {
            text.to_string()
        } else {
            format!("{fg}{text}{}", self.reset())
        }
    }

    /// `text` dimmed in the theme's dim color.
    #[must_use]
    pub fn muted(&self, text: &str) -> String {
        if self.color {
            format!("{}{}{text}{}", self.dim(), self.fg(&self.colors().text_dim), self.reset())
        } else {
            text.to_string()
        }
    }

    /// `text` styled as the selected row; reverse video when the theme has no
    /// selection colors.
    #[must_use]
    pub fn selected(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let style = format!("{}{}", self.fg(&self.colors().selection_fg), self.bg(&self.colors().selection_bg));
        let style = if style.is_empty() { Theme::reverse().to_string() } else { style };
        format!("{style}{text}{}", self.reset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_emits_no_escapes() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, 80, 24).with_color(false);
        assert_eq!(ctx.paint(&theme.colors.key_fg, "k"), "k");
        assert_eq!(ctx.selected("row"), "row");
        assert_eq!(ctx.bold(), "");
        assert_eq!(ctx.muted("x"), "x");
    }

    #[test]
    fn plain_theme_selection_uses_reverse_video() {
        let theme = Theme::from_name("plain").unwrap();
        let ctx = RenderContext::new(&theme, 80, 24);
        assert_eq!(ctx.selected("row"), "\u{1b}[7mrow\u{1b}[0m");
        assert_eq!(ctx.paint(&theme.colors.key_fg, "k"), "k");
    }
}
