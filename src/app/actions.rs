//! Actions representing side effects to be executed by the host loop.
//!
//! The event handler returns a `Vec<Action>` after processing each event,
//! allowing several side effects to be queued atomically. The host executes
//! them in order: it owns the terminal, the clipboard, the URL opener and the
//! timer queue, none of which the application layer touches directly.
//!
//! # Example
//!
//! ```
//! use nestview::app::{Action, Event};
//! use std::time::Duration;
//!
//! let actions = vec![
//!     Action::Copy("_.items[0]".to_string()),
//!     Action::Schedule { after: Duration::from_secs(2), event: Event::FlashClear { generation: 1 } },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use super::handler::Event;
use std::time::Duration;

/// Commands representing side effects to be executed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the program. The host restores the terminal and exits.
    Quit,

    /// Feed `event` back into the handler once `after` has elapsed.
    ///
    /// All timers (spinner ticks, status timeout, flash clearing, delayed
    /// exit) are realized this way.
    Schedule {
        /// Delay from now.
        after: Duration,
        /// Event to deliver.
        event: Event,
    },

    /// Put text on the system clipboard.
    Copy(String),

    /// Open a URL with the platform opener.
    OpenUrl(String),
}
