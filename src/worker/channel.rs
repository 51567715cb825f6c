//! One-shot completion channel between an external operation and the UI loop.
//!
//! The producer side never blocks: the channel has room for exactly one value
//! and the sender is consumed by [`CompletionSender::send`]. The receiver is
//! polled without blocking and yields at most one outcome.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use thiserror::Error;

/// Failure reported by an external operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    pub message: String,
}

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of an external operation: an optional success message, or an error.
pub type OperationOutcome = Result<Option<String>, OperationError>;

/// Producer half; owned by the thread running the operation.
#[derive(Debug)]
pub struct CompletionSender {
    inner: SyncSender<OperationOutcome>,
}

/// Consumer half; owned by the status view and polled by the event loop.
#[derive(Debug)]
pub struct CompletionReceiver {
    inner: Receiver<OperationOutcome>,
}

/// Creates a connected sender / receiver pair with capacity one.
#[must_use]
pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    let (tx, rx) = mpsc::sync_channel(1);
    (CompletionSender { inner: tx }, CompletionReceiver { inner: rx })
}

impl CompletionSender {
    /// Delivers the outcome without blocking.
    ///
    /// Returns `false` if the receiver is already gone.
    pub fn send(self, outcome: OperationOutcome) -> bool {
        match self.inner.try_send(outcome) {
            Ok(()) => true,
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("completion receiver dropped before delivery");
                false
            }
            // Unreachable with a single consuming send on a capacity-one channel.
            Err(TrySendError::Full(_)) => false,
        }
    }
}

impl CompletionReceiver {
    /// Polls for the outcome.
    ///
    /// Returns `None` while the operation is still running. A producer that
    /// went away without sending anything is reported as an error outcome.
    #[must_use]
    pub fn try_take(&self) -> Option<OperationOutcome> {
        match self.inner.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(OperationError::new("operation ended without a result")))
            }
        }
    }
}
