//! Work that happens off the UI thread, and the plumbing that brings its
//! results back.
//!
//! - [`channel`]: one-shot, non-blocking completion channel
//! - [`command`]: external shell command as an operation producer
//! - [`scheduler`]: timer queue for tick, timeout and flash-clear events
//! - [`trace`]: trace id propagation onto operation threads
//!
//! All state mutation stays on the UI thread. Producers only ever perform a
//! single non-blocking send; the loop polls the receiver between events.

pub mod channel;
pub mod command;
pub mod scheduler;
pub mod trace;

pub use channel::{completion_channel, CompletionReceiver, CompletionSender, OperationError, OperationOutcome};
pub use command::spawn_command;
pub use scheduler::Scheduler;
pub use trace::TraceContext;
