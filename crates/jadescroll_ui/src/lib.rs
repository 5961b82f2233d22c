//! jadescroll_ui - UI plumbing for the JadeScroll writing client
//!
//! Everything here is single-threaded and poll driven. Timers never fire on
//! their own: the owner passes the current [`Instant`] into `call`/`poll` and
//! reacts to whatever comes back. That keeps the same code usable from a
//! browser `setInterval`, a native loop, and deterministic unit tests.

mod attach;
mod callback;
mod listener;
pub mod timing;

pub use attach::{Attached, ListenerAttacher};
pub use callback::Callback;
pub use listener::{ListenerRegistry, ScopeToken};
pub use timing::{Debouncer, Interval, Throttle, Timeout};

pub use web_time::{Duration, Instant};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attach::{Attached, ListenerAttacher};
    pub use crate::callback::Callback;
    pub use crate::listener::{ListenerRegistry, ScopeToken};
    pub use crate::timing::{Debouncer, Interval, Throttle, Timeout};
    pub use web_time::{Duration, Instant};
}
