//! Platform listener attachment with a non-cancellable fallback.
//!
//! Platform listeners are normally attached under a cancellation signal so
//! a later setup can tear them down. When that path is unavailable or
//! fails, a listener is attached permanently instead. Permanent listeners
//! are remembered by key and never attached twice.

use std::collections::HashSet;
use std::fmt;

/// How one listener ended up attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attached {
    /// Attached under the cancellation signal
    Scoped,
    /// Attached without a signal; lives as long as its target
    Permanent,
    /// A permanent listener with this key is already in place
    AlreadyPermanent,
    /// Neither path worked
    Failed,
}

/// Tracks permanent listeners across repeated setups.
#[derive(Debug, Default)]
pub struct ListenerAttacher {
    permanent: HashSet<String>,
}

impl ListenerAttacher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the listener identified by `key`.
    ///
    /// `scoped` is `None` when no cancellation signal could be created.
    /// Otherwise it is tried first and `permanent` only runs if it fails.
    pub fn attach<S, P, E>(&mut self, key: &str, scoped: Option<S>, permanent: P) -> Attached
    where
        S: FnOnce() -> Result<(), E>,
        P: FnOnce() -> Result<(), E>,
        E: fmt::Debug,
    {
        if self.permanent.contains(key) {
            log::debug!("Listener '{}' already attached permanently", key);
            return Attached::AlreadyPermanent;
        }

        if let Some(scoped) = scoped {
            match scoped() {
                Ok(()) => return Attached::Scoped,
                Err(e) => log::warn!("⚠️ Scoped listener '{}' failed ({:?}), using fallback", key, e),
            }
        }

        match permanent() {
            Ok(()) => {
                self.permanent.insert(key.to_string());
                Attached::Permanent
            }
            Err(e) => {
                log::error!("❌ Could not attach listener '{}': {:?}", key, e);
                Attached::Failed
            }
        }
    }

    /// Number of listeners attached permanently.
    pub fn permanent_count(&self) -> usize {
        self.permanent.len()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    type Attempt = fn() -> Result<(), &'static str>;

    fn ok() -> Result<(), &'static str> {
        Ok(())
    }

    fn fail() -> Result<(), &'static str> {
        Err("not supported")
    }

    #[test]
    fn test_scoped_path_preferred() {
        let mut attacher = ListenerAttacher::new();
        let permanent_ran = Cell::new(false);
        let result = attacher.attach("editor:input", Some(ok as Attempt), || {
            permanent_ran.set(true);
            ok()
        });

        assert_eq!(result, Attached::Scoped);
        assert!(!permanent_ran.get());
        assert_eq!(attacher.permanent_count(), 0);
    }

    #[test]
    fn test_failed_scoped_falls_back_to_permanent() {
        let mut attacher = ListenerAttacher::new();
        assert_eq!(
            attacher.attach("editor:input", Some(fail as Attempt), ok),
            Attached::Permanent
        );
        assert_eq!(
            attacher.attach("editor:blur", None::<Attempt>, ok),
            Attached::Permanent
        );
        assert_eq!(attacher.permanent_count(), 2);
    }

    #[test]
    fn test_permanent_listener_not_attached_twice() {
        let mut attacher = ListenerAttacher::new();
        attacher.attach("editor:input", None::<Attempt>, ok);

        let attempts = Cell::new(0);
        let result = attacher.attach(
            "editor:input",
            Some(|| {
                attempts.set(attempts.get() + 1);
                ok()
            }),
            || {
                attempts.set(attempts.get() + 1);
                ok()
            },
        );
        assert_eq!(result, Attached::AlreadyPermanent);
        assert_eq!(attempts.get(), 0);
    }

    #[test]
    fn test_both_paths_failing() {
        let mut attacher = ListenerAttacher::new();
        assert_eq!(
            attacher.attach("editor:focus", Some(fail as Attempt), fail),
            Attached::Failed
        );
        assert_eq!(attacher.permanent_count(), 0);
        // A later setup may still succeed.
        assert_eq!(
            attacher.attach("editor:focus", Some(ok as Attempt), fail),
            Attached::Scoped
        );
    }
}
