//! Fixed-period repeating timer.

use web_time::{Duration, Instant};

/// Fires once per `period`, measured from when it was started.
///
/// Missed periods are not replayed: if the owner polls late, the interval
/// fires once and realigns to the next period boundary after `now`.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    /// Start an interval whose first tick is one `period` after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: now + period,
        }
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next tick is due.
    pub fn next_tick(&self) -> Instant {
        self.next
    }

    /// Returns true if a tick is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        if self.period.is_zero() {
            self.next = now;
            return true;
        }
        while self.next <= now {
            self.next += self.period;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_each_period() {
        let t0 = Instant::now();
        let mut interval = Interval::new(Duration::from_secs(60), t0);
        assert!(!interval.poll(t0 + Duration::from_secs(59)));
        assert!(interval.poll(t0 + Duration::from_secs(60)));
        assert!(!interval.poll(t0 + Duration::from_secs(61)));
        assert!(interval.poll(t0 + Duration::from_secs(120)));
    }

    #[test]
    fn test_late_poll_fires_once() {
        let t0 = Instant::now();
        let mut interval = Interval::new(Duration::from_secs(60), t0);
        assert!(interval.poll(t0 + Duration::from_secs(250)));
        assert!(!interval.poll(t0 + Duration::from_secs(251)));
        assert_eq!(interval.next_tick(), t0 + Duration::from_secs(300));
    }
}
