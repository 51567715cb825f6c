//! Timer queue that re-injects scheduled events into the event loop.
//!
//! Timers never mutate state directly: the loop asks for due events and feeds
//! them through the same update path as key presses.

use std::time::{Duration, Instant};

/// Pending events ordered by due time.
#[derive(Debug)]
pub struct Scheduler<E> {
    pending: Vec<(Instant, E)>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<E> Scheduler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `event` to fire `after` from `now`.
    pub fn schedule(&mut self, now: Instant, after: Duration, event: E) {
        let due = now + after;
        let at = self.pending.partition_point(|(t, _)| *t <= due);
        self.pending.insert(at, (due, event));
    }

    /// Removes and returns every event due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<E> {
        let split = self.pending.partition_point(|(t, _)| *t <= now);
        self.pending.drain(..split).map(|(_, event)| event).collect()
    }

    /// Time until the next event, saturating at zero.
    #[must_use]
    pub fn next_in(&self, now: Instant) -> Option<Duration> {
        self.pending.first().map(|(t, _)| t.saturating_duration_since(now))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
