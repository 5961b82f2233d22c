//! JadeScroll - novel writing workspace
//!
//! The autosave core of the workspace: typing, leaving a field and domain
//! updates funnel into one debounced save that tries the remote store,
//! falls back to local storage and reports a visible save status. Runs in
//! the browser (wasm) and as a terminal session (native).

mod app;
mod config;
pub mod constants;
mod health;
mod input;
mod message;
mod model;
pub mod save;

pub use app::{EditorFields, JadeScrollApp};
pub use config::{AppConfig, ConfigError, LogLevel, SaveTimings, UserPreferences};
pub use health::HealthReport;
pub use input::{InputBinder, ThrottledInput};
pub use message::{FieldId, Message, RawEvent};
pub use model::*;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
