//! Time-based call-rate limiters.
//!
//! All types here store deadlines and hand back payloads from `poll` once a
//! deadline has passed. None of them hold callbacks, so the caller keeps full
//! `&mut` access to its own state when acting on a fired timer.

mod debounce;
mod interval;
mod throttle;
mod timeout;

pub use debounce::Debouncer;
pub use interval::Interval;
pub use throttle::Throttle;
pub use timeout::Timeout;
