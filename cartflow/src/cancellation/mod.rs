//! Cooperative cancellation signal shared between a tracked operation and
//! its handle.

mod token;

pub use token::{CancelReason, CancellationToken};
