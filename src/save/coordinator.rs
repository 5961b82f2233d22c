//! Save coordination.
//!
//! All save triggers (typing, leaving a field, domain updates, heartbeat)
//! funnel into one debounced entry point. When the debounce settles the
//! coordinator checks for changes, tries the remote store, falls back to
//! local storage, and reports the outcome through the [`StatusReporter`].
//!
//! At most one save is in flight. A trigger that settles while a save is
//! running is dropped, not queued; the next natural trigger (or the
//! heartbeat) picks the content up.

use std::fmt;
use std::task::Poll;

use jadescroll_ui::Debouncer;
use web_time::{Duration, Instant};

use super::backend::{BackendFuture, RemoteBackend, poll_once};
use super::change::has_changed;
use super::status::{ConnectionState, SaveStatus, StatusReporter};
use super::storage::LocalStore;
use super::{BackendError, StorageError};
use crate::constants::{LAST_SAVED_CONTENT_KEY, STATE_KEY};
use crate::model::AppState;

/// What asked for a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveTrigger {
    Input,
    Blur,
    Heartbeat,
    CharacterUpdated,
    ChapterUpdated,
    Manual,
}

impl fmt::Display for SaveTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SaveTrigger::Input => "input",
            SaveTrigger::Blur => "blur",
            SaveTrigger::Heartbeat => "heartbeat",
            SaveTrigger::CharacterUpdated => "character-updated",
            SaveTrigger::ChapterUpdated => "chapter-updated",
            SaveTrigger::Manual => "manual",
        })
    }
}

/// Result of one save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Persisted by the remote store
    Remote,
    /// Remote unavailable or failed, persisted to local storage
    Local,
    /// Both remote and local persistence failed
    Failed,
    /// Content equal to the last save, nothing written
    Unchanged,
    /// Another save was in flight, trigger dropped
    Busy,
    /// Remote save started and has not finished yet
    Pending,
}

struct InFlightSave {
    future: BackendFuture<Result<bool, BackendError>>,
    content: String,
    trigger: SaveTrigger,
    started: Instant,
}

/// Owns the persistence backends, the debounce timer and the in-flight guard.
pub struct SaveCoordinator {
    remote: Box<dyn RemoteBackend>,
    local: Box<dyn LocalStore>,
    debounce: Debouncer<SaveTrigger>,
    in_flight: Option<InFlightSave>,
    /// Editor content of the last successful save
    snapshot: String,
    last_save: Option<Instant>,
    connection: ConnectionState,
    last_outcome: Option<SaveOutcome>,
}

impl SaveCoordinator {
    /// Create a coordinator. The change-detection snapshot is read back from
    /// local storage so a reload does not re-save unchanged content.
    pub fn new(
        remote: Box<dyn RemoteBackend>,
        local: Box<dyn LocalStore>,
        debounce: Duration,
    ) -> Self {
        let snapshot = match local.get(LAST_SAVED_CONTENT_KEY) {
            Ok(content) => content.unwrap_or_default(),
            Err(e) => {
                log::warn!("Could not read last saved content: {}", e);
                String::new()
            }
        };

        log::debug!(
            "Save coordinator ready (remote: {}, snapshot: {} chars)",
            remote.name(),
            snapshot.chars().count()
        );

        Self {
            remote,
            local,
            debounce: Debouncer::new(debounce),
            in_flight: None,
            snapshot,
            last_save: None,
            connection: ConnectionState::Offline,
            last_outcome: None,
        }
    }

    /// Ask for a save once the debounce window has been quiet.
    pub fn request_save(&mut self, trigger: SaveTrigger, now: Instant) {
        log::trace!("Save requested by {}", trigger);
        self.debounce.call(trigger, now);
    }

    /// Whether a debounced request is waiting.
    pub fn has_pending_request(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Whether a remote save is in flight.
    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Time of the last successful save (remote or local).
    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Age of the last successful save, `None` if nothing was saved yet.
    pub fn time_since_last_save(&self, now: Instant) -> Option<Duration> {
        self.last_save.map(|t| now.saturating_duration_since(t))
    }

    /// Editor content of the last successful save.
    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn last_outcome(&self) -> Option<SaveOutcome> {
        self.last_outcome
    }

    pub fn remote(&self) -> &dyn RemoteBackend {
        self.remote.as_ref()
    }

    pub fn remote_mut(&mut self) -> &mut dyn RemoteBackend {
        self.remote.as_mut()
    }

    pub fn local(&self) -> &dyn LocalStore {
        self.local.as_ref()
    }

    pub fn local_mut(&mut self) -> &mut dyn LocalStore {
        self.local.as_mut()
    }

    /// Both backends at once, for probes that need to read one and write the other.
    pub fn backends_mut(&mut self) -> (&dyn RemoteBackend, &mut dyn LocalStore) {
        (self.remote.as_ref(), self.local.as_mut())
    }

    /// Record the connection state in the coordinator, the state record and the indicator.
    pub fn set_connection(
        &mut self,
        connection: ConnectionState,
        state: &mut AppState,
        status: &mut StatusReporter,
    ) {
        if self.connection != connection {
            log::info!("🔌 Connection: {}", connection.label());
        }
        self.connection = connection;
        state.is_connected = connection.is_online();
        status.set_connection(connection);
    }

    /// Advance the in-flight save and the debounce timer.
    pub fn tick(
        &mut self,
        state: &mut AppState,
        content: &str,
        status: &mut StatusReporter,
        now: Instant,
    ) {
        self.poll_in_flight(state, status, now);

        if let Some(trigger) = self.debounce.poll(now) {
            self.save_now(trigger, state, content, status, now);
        }
    }

    /// Run the save body immediately, bypassing the debounce timer.
    pub fn save_now(
        &mut self,
        trigger: SaveTrigger,
        state: &mut AppState,
        content: &str,
        status: &mut StatusReporter,
        now: Instant,
    ) -> SaveOutcome {
        let outcome = self.begin_save(trigger, state, content, status, now);
        self.last_outcome = Some(outcome);
        outcome
    }

    fn begin_save(
        &mut self,
        trigger: SaveTrigger,
        state: &mut AppState,
        content: &str,
        status: &mut StatusReporter,
        now: Instant,
    ) -> SaveOutcome {
        if let Some(running) = &self.in_flight {
            log::info!(
                "⏳ Save ({}) still running, dropping {} trigger",
                running.trigger,
                trigger
            );
            return SaveOutcome::Busy;
        }

        if !has_changed(content, &self.snapshot) {
            log::debug!("📝 No changes - skipping {} save", trigger);
            return SaveOutcome::Unchanged;
        }

        state.current_chapter.content = content.to_string();
        status.show(SaveStatus::Saving, now);
        log::debug!(
            "📝 Saving {} characters ({})",
            content.chars().count(),
            trigger
        );

        if !self.remote.is_active() {
            log::debug!("No remote backend, saving locally");
            self.set_connection(ConnectionState::Offline, state, status);
            return self.save_locally(state, content, status, now);
        }

        let mut future = self.remote.save(state);
        match poll_once(&mut future) {
            Poll::Ready(result) => self.finish_remote(result, state, content, status, now),
            Poll::Pending => {
                self.in_flight = Some(InFlightSave {
                    future,
                    content: content.to_string(),
                    trigger,
                    started: now,
                });
                SaveOutcome::Pending
            }
        }
    }

    fn poll_in_flight(&mut self, state: &mut AppState, status: &mut StatusReporter, now: Instant) {
        let Some(running) = self.in_flight.as_mut() else {
            return;
        };
        let Poll::Ready(result) = poll_once(&mut running.future) else {
            return;
        };

        // Release the guard before handling the result, whatever it is.
        let Some(finished) = self.in_flight.take() else {
            return;
        };
        log::trace!(
            "Remote save ({}) settled after {:?}",
            finished.trigger,
            now.saturating_duration_since(finished.started)
        );
        let outcome = self.finish_remote(result, state, &finished.content, status, now);
        self.last_outcome = Some(outcome);
    }

    fn finish_remote(
        &mut self,
        result: Result<bool, BackendError>,
        state: &mut AppState,
        content: &str,
        status: &mut StatusReporter,
        now: Instant,
    ) -> SaveOutcome {
        match result {
            Ok(true) => {
                self.set_connection(ConnectionState::Online, state, status);
                self.mark_saved(content, now);
                status.show(SaveStatus::Saved, now);
                log::info!("✅ Auto-save complete ({})", self.remote.name());
                SaveOutcome::Remote
            }
            Ok(false) => {
                log::warn!("💾 {} declined the save, falling back", self.remote.name());
                self.set_connection(ConnectionState::Offline, state, status);
                self.save_locally(state, content, status, now)
            }
            Err(e) => {
                log::error!("💾 Save error: {}", e);
                self.set_connection(ConnectionState::Offline, state, status);
                self.save_locally(state, content, status, now)
            }
        }
    }

    fn save_locally(
        &mut self,
        state: &AppState,
        content: &str,
        status: &mut StatusReporter,
        now: Instant,
    ) -> SaveOutcome {
        let written = state
            .to_json()
            .map_err(StorageError::from)
            .and_then(|json| self.local.set(STATE_KEY, &json));

        match written {
            Ok(()) => {
                self.mark_saved(content, now);
                status.show(SaveStatus::Saved, now);
                log::info!("💾 Saved to local storage");
                SaveOutcome::Local
            }
            Err(e) => {
                log::error!("❌ Local storage error: {}", e);
                status.show(SaveStatus::Error, now);
                SaveOutcome::Failed
            }
        }
    }

    fn mark_saved(&mut self, content: &str, now: Instant) {
        self.snapshot = content.to_string();
        self.last_save = Some(now);
        if let Err(e) = self.local.set(LAST_SAVED_CONTENT_KEY, content) {
            log::warn!("Could not persist last saved content: {}", e);
        }
    }
}
