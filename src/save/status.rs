//! Save status reporting.
//!
//! The reporter projects the coordinator's last outcome into one of four
//! visible states and owns the single auto-reset timer that brings "saved"
//! and "error" back to "ready".

use std::fmt;

use jadescroll_ui::Timeout;
use web_time::{Duration, Instant};

use super::StatusViewError;

/// Visible save state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveStatus {
    Ready,
    Saving,
    Error,
    Saved,
}

impl SaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveStatus::Ready => "ready",
            SaveStatus::Saving => "saving",
            SaveStatus::Error => "error",
            SaveStatus::Saved => "saved",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the most recent remote save went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    Online,
    #[default]
    Offline,
}

impl ConnectionState {
    pub fn is_online(self) -> bool {
        self == ConnectionState::Online
    }

    /// Label of the connection indicator.
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Online => "Online",
            ConnectionState::Offline => "Offline",
        }
    }
}

impl From<bool> for ConnectionState {
    fn from(online: bool) -> Self {
        if online {
            ConnectionState::Online
        } else {
            ConnectionState::Offline
        }
    }
}

/// CSS colors of the status container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub color: &'static str,
}

/// Everything a view needs to draw one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDisplay {
    pub status: SaveStatus,
    pub dot: &'static str,
    pub label: String,
    pub style: StatusStyle,
    /// Pulse animation while a save is running
    pub pulse: bool,
}

impl StatusDisplay {
    /// Fixed label, dot and colors of `status`. "saved" depends on where the data went.
    pub fn for_status(status: SaveStatus, connection: ConnectionState) -> Self {
        let (dot, label, style) = match (status, connection) {
            (SaveStatus::Saving, _) => (
                "🟡",
                "Saving...".to_string(),
                StatusStyle {
                    background: "rgba(243, 156, 18, 0.2)",
                    border: "rgba(243, 156, 18, 0.6)",
                    color: "#f39c12",
                },
            ),
            (SaveStatus::Saved, ConnectionState::Online) => (
                "🟢",
                "Saved (online)".to_string(),
                StatusStyle {
                    background: "rgba(39, 174, 96, 0.2)",
                    border: "rgba(39, 174, 96, 0.6)",
                    color: "#27ae60",
                },
            ),
            (SaveStatus::Saved, ConnectionState::Offline) => (
                "🔵",
                "Saved (local)".to_string(),
                StatusStyle {
                    background: "rgba(52, 152, 219, 0.2)",
                    border: "rgba(52, 152, 219, 0.6)",
                    color: "#3498db",
                },
            ),
            (SaveStatus::Error, _) => (
                "🔴",
                "Save failed".to_string(),
                StatusStyle {
                    background: "rgba(231, 76, 60, 0.2)",
                    border: "rgba(231, 76, 60, 0.6)",
                    color: "#e74c3c",
                },
            ),
            (SaveStatus::Ready, _) => (
                "🟢",
                "Ready to write".to_string(),
                StatusStyle {
                    background: "rgba(102, 126, 234, 0.15)",
                    border: "rgba(102, 126, 234, 0.4)",
                    color: "#2c3e50",
                },
            ),
        };

        Self {
            status,
            dot,
            label,
            style,
            pulse: status == SaveStatus::Saving,
        }
    }
}

/// Where statuses end up: the page, a terminal, a test recorder.
pub trait StatusView {
    /// Draw the save status. Fails when the target element is missing.
    fn render_status(&mut self, display: &StatusDisplay) -> Result<(), StatusViewError>;

    /// Draw the online/offline indicator.
    fn render_connection(&mut self, connection: ConnectionState) -> Result<(), StatusViewError>;

    /// Required targets the view could not find, for the health check.
    fn missing_targets(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Drives a [`StatusView`] and the auto-reset timer.
pub struct StatusReporter {
    view: Box<dyn StatusView>,
    current: SaveStatus,
    connection: ConnectionState,
    reset: Timeout<()>,
    saved_reset: Duration,
    error_reset: Duration,
}

impl StatusReporter {
    /// Create a reporter. Nothing is rendered until the first [`show`](Self::show).
    pub fn new(view: Box<dyn StatusView>, saved_reset: Duration, error_reset: Duration) -> Self {
        Self {
            view,
            current: SaveStatus::Ready,
            connection: ConnectionState::Offline,
            reset: Timeout::new(),
            saved_reset,
            error_reset,
        }
    }

    /// The last status successfully shown.
    pub fn current(&self) -> SaveStatus {
        self.current
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn view(&self) -> &dyn StatusView {
        self.view.as_ref()
    }

    /// Show `status`, cancelling any pending auto-reset.
    ///
    /// "saved" and "error" schedule their own reset to "ready". If the view
    /// cannot render, the call is logged and has no effect at all.
    pub fn show(&mut self, status: SaveStatus, now: Instant) {
        let display = StatusDisplay::for_status(status, self.connection);
        if let Err(e) = self.view.render_status(&display) {
            log::warn!("⚠️ Cannot show status '{}': {}", status, e);
            return;
        }

        self.reset.cancel();
        self.current = status;
        log::debug!("🔄 Status: {}", display.label);

        match status {
            SaveStatus::Saved => self.reset.schedule((), self.saved_reset, now),
            SaveStatus::Error => self.reset.schedule((), self.error_reset, now),
            SaveStatus::Ready | SaveStatus::Saving => {}
        }
    }

    /// Update the connection indicator. Affects the label of later "saved" statuses.
    pub fn set_connection(&mut self, connection: ConnectionState) {
        self.connection = connection;
        if let Err(e) = self.view.render_connection(connection) {
            log::warn!("⚠️ Cannot show connection state: {}", e);
        }
    }

    /// Revert to "ready" once the pending reset is due.
    pub fn tick(&mut self, now: Instant) {
        if self.reset.poll(now).is_some() {
            self.show(SaveStatus::Ready, now);
        }
    }

    /// When the pending auto-reset fires, if any.
    pub fn reset_deadline(&self) -> Option<Instant> {
        self.reset.deadline()
    }
}
