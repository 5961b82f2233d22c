//! Scenario tests for the save pipeline.
//!
//! These drive the coordinator, status reporter and heartbeat together with
//! simulated time, a scripted remote backend and an in-memory local store.

mod fallback_tests;
pub(crate) mod support;
