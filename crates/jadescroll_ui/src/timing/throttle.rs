//! Trailing-edge throttling.

use web_time::{Duration, Instant};

use super::Timeout;

/// Rate-limits a call to at most once per `delay`.
///
/// The first call (or any call arriving after the window has closed) passes
/// straight through. Calls inside the window are deferred to the end of the
/// window; a later call in the same window replaces the deferred arguments,
/// so the last event of a burst is always delivered, exactly once.
#[derive(Debug, Clone)]
pub struct Throttle<A> {
    delay: Duration,
    last_exec: Option<Instant>,
    trailing: Timeout<A>,
}

impl<A> Throttle<A> {
    /// Create a throttle with the given window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_exec: None,
            trailing: Timeout::new(),
        }
    }

    /// The configured window.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register a call.
    ///
    /// Returns the arguments back when the call should execute immediately.
    /// Otherwise the call is deferred and will come out of [`poll`](Self::poll).
    pub fn call(&mut self, args: A, now: Instant) -> Option<A> {
        match self.last_exec {
            Some(last) if now.saturating_duration_since(last) <= self.delay => {
                self.trailing.schedule_at(args, last + self.delay);
                None
            }
            _ => {
                // A newer leading call supersedes a stale deferred one.
                self.trailing.cancel();
                self.last_exec = Some(now);
                Some(args)
            }
        }
    }

    /// Returns the deferred arguments once the window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        let args = self.trailing.poll(now)?;
        self.last_exec = Some(now);
        Some(args)
    }

    /// Whether a deferred call is waiting.
    pub fn is_pending(&self) -> bool {
        self.trailing.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_call_passes_through() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(500));
        assert_eq!(throttle.call(5, t0), Some(5));
        assert!(!throttle.is_pending());
    }

    #[test]
    fn test_burst_delivers_last_call_at_window_end() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(500));

        assert_eq!(throttle.call("a", t0), Some("a"));
        assert_eq!(throttle.call("b", t0 + ms(100)), None);
        assert_eq!(throttle.call("c", t0 + ms(300)), None);

        assert_eq!(throttle.poll(t0 + ms(499)), None);
        assert_eq!(throttle.poll(t0 + ms(500)), Some("c"));
        // Exactly once.
        assert_eq!(throttle.poll(t0 + ms(2000)), None);
    }

    #[test]
    fn test_at_most_once_per_window() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(500));
        let mut fired = Vec::new();

        // An input every 50ms for 2 seconds.
        for step in 0..=40u64 {
            let now = t0 + ms(step * 50);
            if let Some(v) = throttle.poll(now) {
                fired.push((now, v));
            }
            if let Some(v) = throttle.call(step, now) {
                fired.push((now, v));
            }
        }
        if let Some(v) = throttle.poll(t0 + ms(3000)) {
            fired.push((t0 + ms(3000), v));
        }

        for pair in fired.windows(2) {
            assert!(pair[1].0.duration_since(pair[0].0) >= ms(500));
        }
        assert_eq!(fired.last().map(|(_, v)| *v), Some(40));
    }

    #[test]
    fn test_window_reopens_after_delay() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(500));
        assert_eq!(throttle.call(1, t0), Some(1));
        assert_eq!(throttle.call(2, t0 + ms(501)), Some(2));
    }
}
