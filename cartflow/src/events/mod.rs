//! Event sinks for observing tracker and session activity.
//!
//! Registries and sessions report lifecycle events (`operation.registered`,
//! `operation.resolved`, `operation.rejected`, `operation.suppressed`,
//! `registry.torn_down`, `session.started`, `session.ended`) to an
//! [`EventSink`]. The default sink discards everything.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use std::sync::Arc;

/// Returns the sink used when none is configured.
#[must_use]
pub fn default_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpEventSink)
}
