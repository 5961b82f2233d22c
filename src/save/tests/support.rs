//! Test doubles shared by the save scenario tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::task::Poll;

use web_time::{Duration, Instant};

use crate::constants::LAST_SAVED_CONTENT_KEY;
use crate::model::AppState;
use crate::save::{
    BackendError, BackendFuture, ConnectionState, LocalStore, MemoryStore, RemoteBackend,
    SaveCoordinator, SaveOutcome, SaveStatus, SaveTrigger, StatusDisplay, StatusReporter,
    StatusView, StatusViewError, ready,
};

type SaveResult = Result<bool, BackendError>;
type Slot = Rc<RefCell<Option<SaveResult>>>;

/// What the scripted remote does with the next save.
pub enum Script {
    Resolve(SaveResult),
    /// Stay pending until the returned slot is filled
    Hold(Slot),
}

#[derive(Default)]
struct RemoteInner {
    script: VecDeque<Script>,
    saved: Vec<String>,
    ready: bool,
    connected: bool,
    healthy: bool,
}

/// Remote backend whose answers are queued by the test. Clones share state.
///
/// Unscripted saves succeed.
#[derive(Clone)]
pub struct ScriptedRemote {
    inner: Rc<RefCell<RemoteInner>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RemoteInner {
                ready: true,
                connected: true,
                healthy: true,
                ..Default::default()
            })),
        }
    }

    pub fn push(&self, result: SaveResult) {
        self.inner
            .borrow_mut()
            .script
            .push_back(Script::Resolve(result));
    }

    /// Keep the next save pending until [`PendingSave::resolve`] is called.
    pub fn hold_next(&self) -> PendingSave {
        let slot: Slot = Rc::new(RefCell::new(None));
        self.inner
            .borrow_mut()
            .script
            .push_back(Script::Hold(slot.clone()));
        PendingSave { slot }
    }

    pub fn set_connected(&self, connected: bool) {
        self.inner.borrow_mut().connected = connected;
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.inner.borrow_mut().healthy = healthy;
    }

    pub fn save_count(&self) -> usize {
        self.inner.borrow().saved.len()
    }

    /// Chapter content of every save the remote was asked to perform.
    pub fn saved_contents(&self) -> Vec<String> {
        self.inner.borrow().saved.clone()
    }
}

impl RemoteBackend for ScriptedRemote {
    fn name(&self) -> &str {
        "scripted"
    }

    fn initialize(&mut self) -> BackendFuture<bool> {
        ready(self.inner.borrow().ready)
    }

    fn check_connection(&self) -> BackendFuture<bool> {
        ready(self.inner.borrow().connected)
    }

    fn check_health(&self) -> BackendFuture<bool> {
        ready(self.inner.borrow().healthy)
    }

    fn save(&self, state: &AppState) -> BackendFuture<SaveResult> {
        let mut inner = self.inner.borrow_mut();
        inner.saved.push(state.current_chapter.content.clone());
        match inner.script.pop_front() {
            None => ready(Ok(true)),
            Some(Script::Resolve(result)) => ready(result),
            Some(Script::Hold(slot)) => Box::pin(std::future::poll_fn(move |_| {
                match slot.borrow_mut().take() {
                    Some(result) => Poll::Ready(result),
                    None => Poll::Pending,
                }
            })),
        }
    }
}

/// Handle to a held remote save.
pub struct PendingSave {
    slot: Slot,
}

impl PendingSave {
    pub fn resolve(&self, result: SaveResult) {
        *self.slot.borrow_mut() = Some(result);
    }
}

#[derive(Default)]
struct ViewInner {
    shown: Vec<StatusDisplay>,
    connections: Vec<ConnectionState>,
    missing: Vec<String>,
}

/// Status view recording everything rendered. Clones share state.
#[derive(Clone, Default)]
pub struct RecordingView {
    inner: Rc<RefCell<ViewInner>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<SaveStatus> {
        self.inner.borrow().shown.iter().map(|d| d.status).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.inner
            .borrow()
            .shown
            .iter()
            .map(|d| d.label.clone())
            .collect()
    }

    pub fn last_label(&self) -> Option<String> {
        self.inner.borrow().shown.last().map(|d| d.label.clone())
    }

    pub fn connections(&self) -> Vec<ConnectionState> {
        self.inner.borrow().connections.clone()
    }

    /// Pretend these required targets are missing from the page.
    pub fn set_missing(&self, ids: &[&str]) {
        self.inner.borrow_mut().missing = ids.iter().map(|id| id.to_string()).collect();
    }
}

impl StatusView for RecordingView {
    fn render_status(&mut self, display: &StatusDisplay) -> Result<(), StatusViewError> {
        self.inner.borrow_mut().shown.push(display.clone());
        Ok(())
    }

    fn render_connection(&mut self, connection: ConnectionState) -> Result<(), StatusViewError> {
        self.inner.borrow_mut().connections.push(connection);
        Ok(())
    }

    fn missing_targets(&self) -> Vec<String> {
        self.inner.borrow().missing.clone()
    }
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Coordinator, state and status wired together on a simulated clock.
pub struct Harness {
    pub coordinator: SaveCoordinator,
    pub state: AppState,
    pub status: StatusReporter,
    pub remote: ScriptedRemote,
    pub local: MemoryStore,
    pub view: RecordingView,
    pub t0: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_local(MemoryStore::new())
    }

    /// Build on an existing store, e.g. one holding a previous session's data.
    pub fn with_local(local: MemoryStore) -> Self {
        let remote = ScriptedRemote::new();
        Self::build(Box::new(remote.clone()), remote, local)
    }

    /// Build with a different remote; the scripted one is then unused.
    pub fn with_remote(backend: Box<dyn RemoteBackend>) -> Self {
        Self::build(backend, ScriptedRemote::new(), MemoryStore::new())
    }

    fn build(backend: Box<dyn RemoteBackend>, remote: ScriptedRemote, local: MemoryStore) -> Self {
        let view = RecordingView::new();
        Self {
            coordinator: SaveCoordinator::new(backend, Box::new(local.clone()), ms(3000)),
            state: AppState::new(),
            status: StatusReporter::new(Box::new(view.clone()), ms(4000), ms(5000)),
            remote,
            local,
            view,
            t0: Instant::now(),
        }
    }

    pub fn at(&self, millis: u64) -> Instant {
        self.t0 + ms(millis)
    }

    pub fn request(&mut self, trigger: SaveTrigger, millis: u64) {
        let now = self.at(millis);
        self.coordinator.request_save(trigger, now);
    }

    pub fn tick(&mut self, content: &str, millis: u64) {
        let now = self.at(millis);
        self.coordinator
            .tick(&mut self.state, content, &mut self.status, now);
        self.status.tick(now);
    }

    pub fn save_now(&mut self, content: &str, millis: u64) -> SaveOutcome {
        let now = self.at(millis);
        self.coordinator.save_now(
            SaveTrigger::Manual,
            &mut self.state,
            content,
            &mut self.status,
            now,
        )
    }

    pub fn stored_snapshot(&self) -> Option<String> {
        self.local.get(LAST_SAVED_CONTENT_KEY).ok().flatten()
    }
}
