//! Testing utilities for tracked operations and cart sessions.
//!
//! This module provides:
//! - Manually resolved operations ([`deferred`])
//! - A cart backend driven step by step from the test
//! - A loading observer that records every notification
//! - Assertions for handle states and settlements

mod assertions;
mod deferred;
mod mocks;

pub use assertions::{
    assert_cancelled, assert_handle_state, assert_rejected, assert_resolved,
};
pub use deferred::{deferred, Resolver};
pub use mocks::{BackendCall, RecordingLoadingObserver, ScriptedCartBackend};
