//! Periodic safety-net save.

use jadescroll_ui::Interval;
use web_time::{Duration, Instant};

use super::SaveCoordinator;

/// Fires on a fixed period and asks for a save when the last one is stale.
///
/// The heartbeat does not save by itself: it only feeds the debounced entry
/// point, so unchanged content is still skipped by change detection.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    interval: Interval,
    stale_after: Duration,
}

impl Heartbeat {
    pub fn new(period: Duration, stale_after: Duration, now: Instant) -> Self {
        Self {
            interval: Interval::new(period, now),
            stale_after,
        }
    }

    /// Restart the period from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.interval = Interval::new(self.interval.period(), now);
    }

    /// True when a period has elapsed, no save succeeded within `stale_after`,
    /// and no save is in flight.
    pub fn poll(&mut self, coordinator: &SaveCoordinator, now: Instant) -> bool {
        if !self.interval.poll(now) {
            return false;
        }

        let stale = coordinator
            .time_since_last_save(now)
            .is_none_or(|age| age > self.stale_after);

        if !stale {
            log::trace!("💓 Heartbeat: recent save, nothing to do");
            return false;
        }
        if coordinator.is_saving() {
            log::trace!("💓 Heartbeat: save in flight, skipping");
            return false;
        }
        true
    }
}
