//! Session-owned registry of tracked operations.

use super::handle::{Continuation, FinishGuard, OperationHandle};
use super::settlement::Tracked;
use super::state::OperationState;
use crate::cancellation::{CancelReason, CancellationToken};
use crate::config::TrackerConfig;
use crate::events::{default_sink, EventSink};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Lifecycle of the session owning a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Operations may be registered.
    #[default]
    Active,
    /// The session ended; every handle it owned has been cancelled or settled.
    TornDown,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::TornDown => write!(f, "torn_down"),
        }
    }
}

/// What a call to [`OperationRegistry::teardown`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeardownReport {
    /// Pending handles that were cancelled.
    pub cancelled: usize,
    /// Handles that had already reached a terminal state.
    pub already_terminal: usize,
}

impl TeardownReport {
    /// Returns true if the teardown touched no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cancelled == 0 && self.already_terminal == 0
    }
}

#[derive(Default)]
struct RegistryInner {
    state: SessionState,
    handles: Vec<OperationHandle>,
}

/// The handles of every operation registered by one session.
///
/// Registration spawns the operation on the current Tokio runtime and
/// returns immediately. It also drops handles that already settled, so the
/// registry only grows with the number of operations in flight. Teardown cancels whatever is still pending, so no
/// continuation fires after the session is gone. Dropping the registry tears
/// it down.
pub struct OperationRegistry {
    config: TrackerConfig,
    inner: Mutex<RegistryInner>,
    sink: Arc<dyn EventSink>,
}

impl OperationRegistry {
    /// Creates an empty, active registry.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(RegistryInner::default()),
            sink: default_sink(),
        }
    }

    /// Sets the event sink receiving operation lifecycle events.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Registers an operation with a continuation.
    ///
    /// The continuation runs once, when the operation settles, unless the
    /// handle has been cancelled by then. Outside a Tokio runtime, or after
    /// teardown, the returned handle is already cancelled and the operation
    /// never runs.
    pub fn register<Fut, T, E>(
        &self,
        label: &str,
        operation: Fut,
        continuation: Continuation<T, E>,
    ) -> OperationHandle
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.register_cancellable(label, move |_token| operation, continuation)
    }

    /// Registers an operation that can observe its own cancellation.
    ///
    /// The factory receives the handle's token; an operation that checks it
    /// can stop early instead of running to completion.
    pub fn register_cancellable<F, Fut, T, E>(
        &self,
        label: &str,
        operation: F,
        continuation: Continuation<T, E>,
    ) -> OperationHandle
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let handle = OperationHandle::new(label);

        let Ok(runtime) = Handle::try_current() else {
            warn!(
                operation_id = %handle.id(),
                label = %label,
                "Operation registered outside a Tokio runtime; cancelling immediately"
            );
            return Self::refuse(handle, CancelReason::Other("no runtime".to_string()));
        };

        {
            let mut inner = self.inner.lock();
            if inner.state == SessionState::TornDown {
                drop(inner);
                warn!(
                    operation_id = %handle.id(),
                    label = %label,
                    "Operation registered after teardown; cancelling immediately"
                );
                return Self::refuse(handle, CancelReason::Teardown);
            }
            inner.handles.retain(OperationHandle::is_pending);
            inner.handles.push(handle.clone());
        }

        let future = operation(handle.token().clone());
        let task_handle = handle.clone();
        let sink = self.sink.clone();

        let join = runtime.spawn(async move {
            let _guard = FinishGuard(task_handle.clone());
            let outcome = future.await;
            let settled_as = if outcome.is_ok() {
                OperationState::Resolved
            } else {
                OperationState::Rejected
            };

            if task_handle.try_settle(settled_as) {
                sink.try_emit(
                    &format!("operation.{settled_as}"),
                    Some(operation_payload(&task_handle)),
                );
                continuation.invoke(outcome);
            } else {
                debug!(
                    operation_id = %task_handle.id(),
                    label = %task_handle.label(),
                    "Settlement suppressed for cancelled operation"
                );
                sink.try_emit("operation.suppressed", Some(operation_payload(&task_handle)));
            }
        });

        if self.config.abort_on_cancel {
            handle.abort_on_cancel(join.abort_handle());
        }

        debug!(operation_id = %handle.id(), label = %label, "Operation registered");
        self.sink
            .try_emit("operation.registered", Some(operation_payload(&handle)));

        handle
    }

    fn refuse(handle: OperationHandle, reason: CancelReason) -> OperationHandle {
        handle.cancel_with(reason);
        handle.mark_finished();
        handle
    }

    /// Registers an operation whose outcome is delivered to the returned
    /// [`Tracked`].
    pub fn track<Fut, T, E>(&self, label: &str, operation: Fut) -> Tracked<T, E>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.track_with(label, operation, |_| {})
    }

    /// Like [`track`](Self::track), running `before_delivery` on the outcome
    /// just before it is handed to the awaiting side.
    ///
    /// `before_delivery` is part of the continuation: it never runs for a
    /// cancelled handle.
    pub fn track_with<Fut, T, E, B>(
        &self,
        label: &str,
        operation: Fut,
        before_delivery: B,
    ) -> Tracked<T, E>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        B: FnOnce(&Result<T, E>) + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let continuation = Continuation::from_fn(move |outcome: Result<T, E>| {
            before_delivery(&outcome);
            // The awaiting side may have gone away.
            let _ = sender.send(outcome);
        });

        let handle = self.register(label, operation, continuation);
        Tracked::new(handle, receiver)
    }

    /// Cancels every pending handle, clears the registry and marks the
    /// session torn down.
    ///
    /// Safe to call repeatedly; later calls report nothing.
    pub fn teardown(&self) -> TeardownReport {
        let handles = {
            let mut inner = self.inner.lock();
            inner.state = SessionState::TornDown;
            std::mem::take(&mut inner.handles)
        };

        let mut report = TeardownReport::default();
        for handle in &handles {
            if handle.cancel_with(CancelReason::Teardown) {
                report.cancelled += 1;
            } else {
                report.already_terminal += 1;
            }
        }

        if !report.is_empty() {
            debug!(
                cancelled = report.cancelled,
                already_terminal = report.already_terminal,
                "Registry torn down"
            );
            self.sink.try_emit(
                "registry.torn_down",
                Some(serde_json::json!({
                    "cancelled": report.cancelled,
                    "already_terminal": report.already_terminal,
                })),
            );
        }

        report
    }

    /// Removes handles that reached a terminal state.
    ///
    /// Registration does this too. Returns the number of handles removed.
    pub fn prune_settled(&self) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.handles.len();
        inner.handles.retain(OperationHandle::is_pending);
        before - inner.handles.len()
    }

    /// Returns the session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Returns true once the registry has been torn down.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.state() == SessionState::TornDown
    }

    /// Returns a snapshot of the tracked handles in registration order.
    #[must_use]
    pub fn handles(&self) -> Vec<OperationHandle> {
        self.inner.lock().handles.clone()
    }

    /// Returns the number of tracked handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().handles.len()
    }

    /// Returns true if no handles are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().handles.is_empty()
    }

    /// Returns the number of tracked handles still pending.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner
            .lock()
            .handles
            .iter()
            .filter(|handle| handle.is_pending())
            .count()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl Drop for OperationRegistry {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("OperationRegistry")
            .field("state", &inner.state)
            .field("handles", &inner.handles.len())
            .field("abort_on_cancel", &self.config.abort_on_cancel)
            .finish()
    }
}

fn operation_payload(handle: &OperationHandle) -> serde_json::Value {
    serde_json::json!({
        "operation_id": handle.id().to_string(),
        "label": handle.label(),
        "state": handle.state(),
    })
}
