//! Scoped listener registration.
//!
//! A [`ListenerRegistry`] holds handlers that turn raw events into messages.
//! Handlers are registered under a [`ScopeToken`]; renewing the scope tears
//! down every handler of the previous scope in one step, so running a setup
//! routine twice never leaves duplicate handlers behind.

use crate::Callback;

/// Identifies one registration scope. Becomes stale once the registry renews its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeToken(u64);

struct Listener<E, M> {
    scope: ScopeToken,
    handler: Callback<E, Option<M>>,
}

/// Registry of event handlers grouped by cancellable scopes.
pub struct ListenerRegistry<E, M> {
    listeners: Vec<Listener<E, M>>,
    current_scope: Option<ScopeToken>,
    next_id: u64,
}

impl<E: Clone, M> ListenerRegistry<E, M> {
    /// Create an empty registry with no live scope.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            current_scope: None,
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Tear down the live scope (if any) and open a fresh one.
    ///
    /// All handlers registered under the old token are removed and the old
    /// token is rejected from now on.
    pub fn renew_scope(&mut self) -> ScopeToken {
        if let Some(old) = self.current_scope.take() {
            let before = self.listeners.len();
            self.listeners.retain(|l| l.scope != old);
            log::debug!(
                "🧹 Scope {:?} torn down ({} listeners removed)",
                old,
                before - self.listeners.len()
            );
        }
        let token = ScopeToken(self.next_id());
        self.current_scope = Some(token);
        token
    }

    /// Whether `token` is the live scope.
    pub fn is_live(&self, token: ScopeToken) -> bool {
        self.current_scope == Some(token)
    }

    /// Register a handler under `scope`.
    ///
    /// Registering against a stale token is a no-op and returns false.
    pub fn register<F>(&mut self, scope: ScopeToken, handler: F) -> bool
    where
        F: Fn(E) -> Option<M> + 'static,
    {
        if !self.is_live(scope) {
            log::warn!("Ignoring listener registration on stale scope {:?}", scope);
            return false;
        }
        self.listeners.push(Listener {
            scope,
            handler: Callback::new(handler),
        });
        true
    }

    /// Run every handler against `event`, collecting the messages they produce.
    pub fn dispatch(&self, event: &E) -> Vec<M> {
        self.listeners
            .iter()
            .filter_map(|l| l.handler.call(event.clone()).flatten())
            .collect()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E: Clone, M> Default for ListenerRegistry<E, M> {
    fn default() -> Self {
        Self::new()
    }
}
