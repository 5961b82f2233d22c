//! Main JadeScroll application.
//!
//! [`JadeScrollApp`] owns the state record, the editor fields and the save
//! machinery. Platform drivers feed it raw events through
//! [`dispatch`](JadeScrollApp::dispatch) and advance its timers through
//! [`tick`](JadeScrollApp::tick); they never touch the save pipeline
//! directly.

use jadescroll_ui::ListenerRegistry;
use web_time::Instant;

use crate::config::AppConfig;
use crate::constants::STATE_KEY;
use crate::health::HealthReport;
use crate::input::{InputBinder, ThrottledInput};
use crate::message::{FieldId, Message, RawEvent};
use crate::model::{AppState, ModuleId};
use crate::save::{
    ConnectionState, Heartbeat, LocalStore, RemoteBackend, SaveCoordinator, SaveOutcome,
    SaveStatus, SaveTrigger, StatusReporter, StatusView,
};

/// Current values of the watched fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorFields {
    pub content: String,
    pub title: String,
}

impl EditorFields {
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::WritingEditor => &self.content,
            FieldId::ChapterTitle => &self.title,
        }
    }
}

/// Main application state.
pub struct JadeScrollApp {
    config: AppConfig,
    state: AppState,
    fields: EditorFields,
    coordinator: SaveCoordinator,
    status: StatusReporter,
    heartbeat: Heartbeat,
    binder: InputBinder,
    listeners: ListenerRegistry<RawEvent, Message>,
    health: Option<HealthReport>,
    initialized: bool,
}

impl JadeScrollApp {
    /// Create the application. Nothing runs until [`initialize`](Self::initialize).
    pub fn new(
        config: AppConfig,
        remote: Box<dyn RemoteBackend>,
        local: Box<dyn LocalStore>,
        view: Box<dyn StatusView>,
        now: Instant,
    ) -> Self {
        let timings = &config.timings;
        let coordinator = SaveCoordinator::new(remote, local, timings.debounce());
        let status = StatusReporter::new(view, timings.saved_reset(), timings.error_reset());
        let heartbeat = Heartbeat::new(timings.heartbeat(), timings.stale_after(), now);
        let binder = InputBinder::new(timings.throttle(), timings.blur_min());

        Self {
            config,
            state: AppState::new(),
            fields: EditorFields::default(),
            coordinator,
            status,
            heartbeat,
            binder,
            listeners: ListenerRegistry::new(),
            health: None,
            initialized: false,
        }
    }

    /// Run the startup sequence.
    ///
    /// Returns false without doing anything when called a second time.
    /// `listeners_supported` reports whether the platform can deliver input
    /// events, for the health check.
    pub async fn initialize(&mut self, now: Instant, listeners_supported: bool) -> bool {
        if self.initialized {
            log::warn!("⚠️ Application already initialized, ignoring");
            return false;
        }
        self.initialized = true;
        log::info!("📚 Starting {}", self.config.app_name);

        let (remote, local) = self.coordinator.backends_mut();
        let report = HealthReport::run(local, self.status.view(), remote, listeners_supported).await;
        self.health = Some(report);

        self.status.show(SaveStatus::Ready, now);

        // Editor and snapshot must agree before anything can trigger a save.
        self.load_local_data();

        let remote_ready = self.coordinator.remote_mut().initialize().await;
        if remote_ready {
            let connected = self.coordinator.remote().check_connection().await;
            self.set_connection(ConnectionState::from(connected));
        } else {
            log::info!("🔌 Remote not connected, using local storage");
            self.set_connection(ConnectionState::Offline);
        }

        self.setup_listeners();
        self.heartbeat.restart(now);
        log::info!("🟢 Auto-save ready");
        true
    }

    /// Bind the watched fields. Safe to call repeatedly.
    pub fn setup_listeners(&mut self) {
        self.binder.bind(&mut self.listeners);
    }

    /// Merge the locally persisted state and fill the editor from it.
    ///
    /// Returns true when a snapshot was found and merged.
    pub fn load_local_data(&mut self) -> bool {
        let json = match self.coordinator.local().get(STATE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::debug!("No local data yet");
                return false;
            }
            Err(e) => {
                log::warn!("Could not read local data: {}", e);
                return false;
            }
        };

        let loaded = match self.state.merge_snapshot(&json) {
            Ok(()) => {
                log::info!("📂 Loaded local data");
                true
            }
            Err(e) => {
                log::warn!("⚠️ Ignoring unreadable local data: {}", e);
                false
            }
        };

        // The persisted flag describes an old session, not this one.
        self.state.is_connected = self.coordinator.connection().is_online();
        self.fields.content = self.state.current_chapter.content.clone();
        self.fields.title = self.state.current_chapter.title.clone();
        loaded
    }

    /// Route a raw event through the bound listeners.
    ///
    /// Events arriving before the listeners are bound are ignored.
    pub fn dispatch(&mut self, event: RawEvent, now: Instant) {
        for message in self.listeners.dispatch(&event) {
            self.update(message, now);
        }
    }

    /// Handle a message.
    pub fn update(&mut self, message: Message, now: Instant) {
        match message {
            Message::FieldInput { field, value } => {
                if field == FieldId::ChapterTitle {
                    self.state.current_chapter.title = value.clone();
                }
                let input = self.binder.on_input(field, &value, now);
                match field {
                    FieldId::WritingEditor => self.fields.content = value,
                    FieldId::ChapterTitle => self.fields.title = value,
                }
                if let Some(input) = input {
                    self.on_throttled_input(input, now);
                }
            }
            Message::FieldBlurred(field) => {
                log::debug!("👆 Left field: {}", field.element_id());
                let age = self.coordinator.time_since_last_save(now);
                if self.binder.should_save_on_blur(age) {
                    self.coordinator.request_save(SaveTrigger::Blur, now);
                }
            }
            Message::FieldFocused { field, value } => {
                log::debug!("👆 Entered field: {}", field.element_id());
                if InputBinder::should_reset_on_focus(&value) {
                    self.status.show(SaveStatus::Ready, now);
                }
            }
            Message::CharacterUpdated => {
                log::info!("📝 Character updated - triggering save");
                self.coordinator
                    .request_save(SaveTrigger::CharacterUpdated, now);
            }
            Message::ChapterUpdated => {
                log::info!("📝 Chapter updated - triggering save");
                self.coordinator.request_save(SaveTrigger::ChapterUpdated, now);
            }
            Message::SwitchModule(module) => self.switch_module(module),
        }
    }

    fn on_throttled_input(&mut self, input: ThrottledInput, now: Instant) {
        log::debug!(
            "📝 Typing in {} - {} characters",
            input.field.element_id(),
            input.len
        );
        if self.config.preferences.optimistic_status {
            self.status.show(SaveStatus::Saving, now);
        }
        self.coordinator.request_save(SaveTrigger::Input, now);
    }

    /// Advance every timer: throttled input, heartbeat, debounce, in-flight
    /// save and status reset, in that order.
    pub fn tick(&mut self, now: Instant) {
        for input in self.binder.poll(now) {
            self.on_throttled_input(input, now);
        }

        if self.initialized && self.heartbeat.poll(&self.coordinator, now) {
            log::info!("💓 Heartbeat auto-save");
            self.coordinator.request_save(SaveTrigger::Heartbeat, now);
        }

        self.coordinator
            .tick(&mut self.state, &self.fields.content, &mut self.status, now);
        self.status.tick(now);
    }

    /// Save immediately, skipping the debounce window.
    pub fn flush(&mut self, now: Instant) -> SaveOutcome {
        self.coordinator.save_now(
            SaveTrigger::Manual,
            &mut self.state,
            &self.fields.content,
            &mut self.status,
            now,
        )
    }

    /// Change the active content panel.
    pub fn switch_module(&mut self, module: ModuleId) {
        if self.state.current_module != module {
            log::info!("🔀 Module: {} -> {}", self.state.current_module, module);
        }
        self.state.current_module = module;
    }

    fn set_connection(&mut self, connection: ConnectionState) {
        self.coordinator
            .set_connection(connection, &mut self.state, &mut self.status);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn fields(&self) -> &EditorFields {
        &self.fields
    }

    pub fn coordinator(&self) -> &SaveCoordinator {
        &self.coordinator
    }

    pub fn status(&self) -> &StatusReporter {
        &self.status
    }

    /// Result of the startup health check, once initialized.
    pub fn health(&self) -> Option<HealthReport> {
        self.health
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
