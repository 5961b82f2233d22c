//! Debouncing: run once after a quiet period.

use web_time::{Duration, Instant};

use super::Timeout;

/// Delays a call until `wait` has elapsed with no further calls.
///
/// Every [`call`](Self::call) pushes the deadline back and replaces the
/// pending arguments, so only the most recent invocation's arguments come
/// out of [`poll`](Self::poll).
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    wait: Duration,
    timer: Timeout<A>,
}

impl<A> Debouncer<A> {
    /// Create a debouncer with the given quiet period.
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            timer: Timeout::new(),
        }
    }

    /// The configured quiet period.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Register a call. Resets the pending timer.
    pub fn call(&mut self, args: A, now: Instant) {
        self.timer.schedule(args, self.wait, now);
    }

    /// Drop the pending call, if any.
    pub fn cancel(&mut self) -> bool {
        self.timer.cancel()
    }

    /// Whether a call is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// When the pending call will fire.
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Returns the latest arguments once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        self.timer.poll(now)
    }
}
