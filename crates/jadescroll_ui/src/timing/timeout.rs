//! Single replaceable one-shot timer.

use web_time::{Duration, Instant};

/// A one-shot timer carrying a payload.
///
/// At most one deadline is alive at a time: scheduling again replaces both
/// the deadline and the payload of the previous schedule, so an older timer
/// can never fire after a newer one was set.
#[derive(Debug, Clone)]
pub struct Timeout<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Timeout<T> {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule `payload` to fire `delay` after `now`, cancelling any pending schedule.
    pub fn schedule(&mut self, payload: T, delay: Duration, now: Instant) {
        self.schedule_at(payload, now + delay);
    }

    /// Schedule `payload` to fire at `deadline`, cancelling any pending schedule.
    pub fn schedule_at(&mut self, payload: T, deadline: Instant) {
        self.pending = Some((deadline, payload));
    }

    /// Cancel the pending schedule. Returns true if something was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether a schedule is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending schedule, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Take the payload if its deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((deadline, _)) if deadline <= now => self.pending.take().map(|(_, p)| p),
            _ => None,
        }
    }
}

impl<T> Default for Timeout<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_at_deadline() {
        let t0 = Instant::now();
        let mut timeout = Timeout::new();
        timeout.schedule("reset", Duration::from_secs(4), t0);

        assert_eq!(timeout.poll(t0 + Duration::from_millis(3999)), None);
        assert_eq!(timeout.poll(t0 + Duration::from_secs(4)), Some("reset"));
        assert_eq!(timeout.poll(t0 + Duration::from_secs(10)), None);
        assert!(!timeout.is_pending());
    }

    #[test]
    fn test_reschedule_replaces_previous() {
        let t0 = Instant::now();
        let mut timeout = Timeout::new();
        timeout.schedule(1, Duration::from_secs(4), t0);
        timeout.schedule(2, Duration::from_secs(5), t0 + Duration::from_secs(2));

        // The first deadline passes without firing.
        assert_eq!(timeout.poll(t0 + Duration::from_secs(4)), None);
        assert_eq!(timeout.poll(t0 + Duration::from_secs(7)), Some(2));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut timeout = Timeout::new();
        assert!(!timeout.cancel());
        timeout.schedule((), Duration::from_secs(1), t0);
        assert!(timeout.cancel());
        assert_eq!(timeout.poll(t0 + Duration::from_secs(2)), None);
    }
}
