//! Input mode state for the application.
//!
//! The application operates in one of two input modes:
//! - **Normal**: keys resolve through the active [`KeyMode`](crate::domain::KeyMode)
//!   to logical actions, or go to the active custom view
//! - **Expression**: keys edit the expression bar and drive completion
//!
//! # Example
//!
//! ```
//! use nestview::app::InputMode;
//!
//! let mode = InputMode::default();
//! assert_eq!(mode, InputMode::Normal);
//! ```

/// Current input handling mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation and command mode.
    #[default]
    Normal,

    /// The expression bar is open and owns the keyboard.
    ///
    /// Characters edit the input, Tab/Shift+Tab cycle completions, Up/Down
    /// browse the suggestion list, Enter submits and Esc cancels.
    Expression,
}
