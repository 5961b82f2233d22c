//! Remote failure, local fallback and the error status.

use super::support::Harness;
use crate::constants::STATE_KEY;
use crate::model::AppState;
use crate::save::{
    BackendError, ConnectionState, InactiveRemote, LocalStore, SaveOutcome, SaveStatus,
};

#[test]
fn test_declined_remote_save_falls_back_to_local() {
    let mut h = Harness::new();
    h.remote.push(Ok(false));

    assert_eq!(h.save_now("Offline draft", 0), SaveOutcome::Local);
    assert_eq!(h.coordinator.connection(), ConnectionState::Offline);
    assert!(!h.state.is_connected);
    assert_eq!(h.view.last_label().as_deref(), Some("Saved (local)"));
    assert_eq!(h.coordinator.snapshot(), "Offline draft");
    assert_eq!(h.coordinator.last_save(), Some(h.at(0)));
}

#[test]
fn test_remote_error_falls_back_to_local() {
    let mut h = Harness::new();
    h.remote.push(Err(BackendError::Rejected("permission denied".into())));

    assert_eq!(h.save_now("Draft", 0), SaveOutcome::Local);
    assert_eq!(h.view.statuses(), vec![SaveStatus::Saving, SaveStatus::Saved]);

    let json = h
        .local
        .get(STATE_KEY)
        .expect("read state")
        .expect("state written");
    let stored: AppState = serde_json::from_str(&json).expect("valid state");
    assert_eq!(stored.current_chapter.content, "Draft");
    assert!(!stored.is_connected);
}

#[test]
fn test_recovery_switches_back_online() {
    let mut h = Harness::new();
    h.remote.push(Err(BackendError::Transport("timeout".into())));
    h.save_now("one", 0);
    h.save_now("two", 1000);

    assert_eq!(
        h.view.connections(),
        vec![ConnectionState::Offline, ConnectionState::Online]
    );
    assert_eq!(h.view.last_label().as_deref(), Some("Saved (online)"));
}

#[test]
fn test_inactive_remote_saves_locally() {
    let mut h = Harness::with_remote(Box::new(InactiveRemote));

    assert_eq!(h.save_now("No cloud here", 0), SaveOutcome::Local);
    assert_eq!(h.coordinator.connection(), ConnectionState::Offline);
    assert!(h.local.contains(STATE_KEY));
    assert_eq!(h.view.last_label().as_deref(), Some("Saved (local)"));
}

#[test]
fn test_both_failing_reports_error() {
    let mut h = Harness::new();
    h.remote.push(Err(BackendError::Transport("offline".into())));
    h.local.set_failing(true);

    assert_eq!(h.save_now("Lost words", 0), SaveOutcome::Failed);
    assert_eq!(h.status.current(), SaveStatus::Error);
    assert_eq!(h.view.last_label().as_deref(), Some("Save failed"));
    // Nothing was persisted, so the next attempt still sees a change.
    assert_eq!(h.coordinator.snapshot(), "");
    assert_eq!(h.coordinator.last_save(), None);

    h.tick("Lost words", 4999);
    assert_eq!(h.status.current(), SaveStatus::Error);
    h.tick("Lost words", 5000);
    assert_eq!(h.status.current(), SaveStatus::Ready);
}

#[test]
fn test_retry_after_quota_error_succeeds() {
    let mut h = Harness::with_remote(Box::new(InactiveRemote));
    h.local.set_failing(true);
    assert_eq!(h.save_now("Big chapter", 0), SaveOutcome::Failed);

    h.local.set_failing(false);
    assert_eq!(h.save_now("Big chapter", 1000), SaveOutcome::Local);
    assert_eq!(h.local.write_count(STATE_KEY), 1);
}
