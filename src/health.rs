//! Startup system health check.
//!
//! Four probes, each pass/fail. A score below [`HEALTH_PASS_RATIO`] of the
//! total only logs a warning; startup continues either way.

use std::fmt;

use crate::constants::{HEALTH_PASS_RATIO, HEALTH_PROBE_KEY};
use crate::save::{LocalStore, RemoteBackend, StatusView};

/// Result of the startup probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Local storage accepts a write and a delete
    pub local_storage: bool,
    /// Every required UI target is present
    pub ui_targets: bool,
    /// The remote backend's API server answered healthy
    pub api_server: bool,
    /// The platform can deliver input events
    pub event_listeners: bool,
}

impl HealthReport {
    /// Run all probes and log the result.
    pub async fn run(
        local: &mut dyn LocalStore,
        view: &dyn StatusView,
        remote: &dyn RemoteBackend,
        listeners_supported: bool,
    ) -> Self {
        let report = Self {
            local_storage: probe_storage(local),
            ui_targets: probe_targets(view),
            api_server: probe_api(remote).await,
            event_listeners: listeners_supported,
        };
        if report.event_listeners {
            log::info!("✅ Event listeners: available");
        } else {
            log::error!("❌ Event listeners: unavailable");
        }
        report.log();
        report
    }

    /// Number of passed probes.
    pub fn score(&self) -> usize {
        [
            self.local_storage,
            self.ui_targets,
            self.api_server,
            self.event_listeners,
        ]
        .into_iter()
        .filter(|passed| *passed)
        .count()
    }

    pub fn total(&self) -> usize {
        4
    }

    /// Rounded percentage of passed probes.
    pub fn percent(&self) -> u32 {
        (self.score() as f64 / self.total() as f64 * 100.0).round() as u32
    }

    /// Whether the score is below the pass ratio.
    pub fn is_degraded(&self) -> bool {
        (self.score() as f64) < self.total() as f64 * HEALTH_PASS_RATIO
    }

    fn log(&self) {
        log::info!("🏥 System health: {}", self);
        if self.is_degraded() {
            log::warn!("⚠️ System degraded - some features may not work");
        }
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.score(), self.total(), self.percent())
    }
}

fn probe_storage(local: &mut dyn LocalStore) -> bool {
    let result = local
        .set(HEALTH_PROBE_KEY, "test")
        .and_then(|()| local.remove(HEALTH_PROBE_KEY));
    match result {
        Ok(()) => {
            log::info!("✅ Local storage: available");
            true
        }
        Err(e) => {
            log::error!("❌ Local storage: {}", e);
            false
        }
    }
}

fn probe_targets(view: &dyn StatusView) -> bool {
    let missing = view.missing_targets();
    if missing.is_empty() {
        log::info!("✅ UI targets: complete");
        true
    } else {
        log::error!("❌ UI targets missing: {:?}", missing);
        false
    }
}

async fn probe_api(remote: &dyn RemoteBackend) -> bool {
    let healthy = remote.is_active() && remote.check_health().await;
    if healthy {
        log::info!("✅ API server: reachable");
    } else {
        log::info!("⚠️ API server: not reachable");
    }
    healthy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::InactiveRemote;
    use crate::save::tests::support::{RecordingView, ScriptedRemote};
    use crate::save::MemoryStore;

    #[test]
    fn test_all_probes_pass() {
        let mut local = MemoryStore::new();
        let report = pollster::block_on(HealthReport::run(
            &mut local,
            &RecordingView::new(),
            &ScriptedRemote::new(),
            true,
        ));

        assert_eq!(report.score(), 4);
        assert_eq!(report.to_string(), "4/4 (100%)");
        assert!(!report.is_degraded());
        // The probe key is cleaned up.
        assert!(!local.contains(HEALTH_PROBE_KEY));
    }

    #[test]
    fn test_three_of_four_is_not_degraded() {
        let report = pollster::block_on(HealthReport::run(
            &mut MemoryStore::new(),
            &RecordingView::new(),
            &InactiveRemote,
            true,
        ));

        assert!(!report.api_server);
        assert_eq!(report.percent(), 75);
        assert!(!report.is_degraded());
    }

    #[test]
    fn test_failed_probes_degrade() {
        let local = MemoryStore::new();
        local.set_failing(true);
        let view = RecordingView::new();
        view.set_missing(&["sidebar"]);
        let remote = ScriptedRemote::new();
        remote.set_healthy(false);

        let report = pollster::block_on(HealthReport::run(
            &mut local.clone(),
            &view,
            &remote,
            true,
        ));

        assert_eq!(
            report,
            HealthReport {
                local_storage: false,
                ui_targets: false,
                api_server: false,
                event_listeners: true,
            }
        );
        assert_eq!(report.to_string(), "1/4 (25%)");
        assert!(report.is_degraded());
    }
}
