//! Autosave and persistence coordination.
//!
//! - [`SaveCoordinator`]: debounced, guarded save with remote → local fallback
//! - [`StatusReporter`]: the four visible save states and their auto-reset
//! - [`Heartbeat`]: periodic safety net for stale saves
//! - [`RemoteBackend`] / [`LocalStore`]: the two persistence collaborators

mod backend;
mod change;
mod coordinator;
mod error;
mod heartbeat;
mod status;
mod storage;

#[cfg(target_arch = "wasm32")]
mod js_remote;

#[cfg(test)]
pub(crate) mod tests;

pub use backend::{BackendFuture, InactiveRemote, RemoteBackend, ready};
pub use change::has_changed;
pub use coordinator::{SaveCoordinator, SaveOutcome, SaveTrigger};
pub use error::{BackendError, StatusViewError, StorageError};
pub use heartbeat::Heartbeat;
pub use status::{
    ConnectionState, SaveStatus, StatusDisplay, StatusReporter, StatusStyle, StatusView,
};
pub use storage::{LocalStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;

#[cfg(target_arch = "wasm32")]
pub use js_remote::JsRemote;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
