//! Remote persistence backend interface.
//!
//! The remote document store is an external collaborator. The coordinator
//! only knows these four operations; whether a backend exists at all is
//! decided once at startup, and "no backend" is simply [`InactiveRemote`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use super::BackendError;
use crate::model::AppState;

/// A boxed, single-threaded future returned by backend operations.
///
/// Futures must not borrow the backend or the state: implementations clone
/// or serialize what they need before returning.
pub type BackendFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Wrap an already-known value as a backend future.
pub fn ready<T: 'static>(value: T) -> BackendFuture<T> {
    Box::pin(std::future::ready(value))
}

/// Poll a backend future once without an executor.
///
/// The save coordinator is driven by the application tick, so it re-polls
/// in-flight saves on every tick instead of relying on wake-ups.
pub(crate) fn poll_once<T>(future: &mut BackendFuture<T>) -> Poll<T> {
    let mut cx = Context::from_waker(Waker::noop());
    future.as_mut().poll(&mut cx)
}

/// A remote document store.
pub trait RemoteBackend {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Whether this backend can be used at all. Inactive backends are never
    /// asked to save; the coordinator goes straight to local storage.
    fn is_active(&self) -> bool {
        true
    }

    /// Prepare the client. Resolves to false when the backend cannot be used.
    fn initialize(&mut self) -> BackendFuture<bool>;

    /// Whether the document store is reachable.
    fn check_connection(&self) -> BackendFuture<bool>;

    /// Whether the backend's API server reports healthy.
    fn check_health(&self) -> BackendFuture<bool>;

    /// Persist the whole state. `Ok(false)` means the store declined without
    /// a transport error; both that and `Err` trigger the local fallback.
    fn save(&self, state: &AppState) -> BackendFuture<Result<bool, BackendError>>;
}

/// Backend used when no remote store is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct InactiveRemote;

impl RemoteBackend for InactiveRemote {
    fn name(&self) -> &str {
        "inactive"
    }

    fn is_active(&self) -> bool {
        false
    }

    fn initialize(&mut self) -> BackendFuture<bool> {
        ready(false)
    }

    fn check_connection(&self) -> BackendFuture<bool> {
        ready(false)
    }

    fn check_health(&self) -> BackendFuture<bool> {
        ready(false)
    }

    fn save(&self, _state: &AppState) -> BackendFuture<Result<bool, BackendError>> {
        ready(Err(BackendError::Unavailable))
    }
}
