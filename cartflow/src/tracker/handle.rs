//! Cancellable operation handles and their continuations.

use super::state::{OperationId, OperationState};
use crate::cancellation::{CancelReason, CancellationToken};
use crate::utils::{now_utc, Timestamp};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// A handle to one tracked operation.
///
/// Cloning is cheap; all clones refer to the same operation. The handle is
/// how an owner cancels the operation and observes its state.
#[derive(Clone)]
pub struct OperationHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    id: OperationId,
    label: String,
    registered_at: Timestamp,
    state: Mutex<OperationState>,
    token: CancellationToken,
    finished: watch::Sender<bool>,
}

impl OperationHandle {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        let (finished, _) = watch::channel(false);
        Self {
            inner: Arc::new(HandleInner {
                id: OperationId::new(),
                label: label.into(),
                registered_at: now_utc(),
                state: Mutex::new(OperationState::Pending),
                token: CancellationToken::new(),
                finished,
            }),
        }
    }

    /// Returns the operation id.
    #[must_use]
    pub fn id(&self) -> OperationId {
        self.inner.id
    }

    /// Returns the label the operation was registered under.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Returns when the operation was registered.
    #[must_use]
    pub fn registered_at(&self) -> Timestamp {
        self.inner.registered_at
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> OperationState {
        *self.inner.state.lock()
    }

    /// Returns true if the operation has not reached a terminal state.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == OperationState::Pending
    }

    /// Returns true if the handle was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state() == OperationState::Cancelled
    }

    /// Returns the cancellation token the operation can observe.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.inner.token
    }

    /// Cancels the operation.
    ///
    /// Returns true if this call moved the handle from `Pending` to
    /// `Cancelled`. Cancelling a terminal handle is a no-op. The underlying
    /// computation keeps running unless it watches the token or the registry
    /// aborts on cancel; only the continuation is suppressed.
    pub fn cancel(&self) -> bool {
        self.cancel_with(CancelReason::Caller)
    }

    pub(crate) fn cancel_with(&self, reason: CancelReason) -> bool {
        if !self.transition(OperationState::Cancelled) {
            return false;
        }

        debug!(
            operation_id = %self.inner.id,
            label = %self.inner.label,
            reason = %reason,
            "Operation cancelled"
        );
        self.inner.token.cancel(reason);
        true
    }

    /// Moves a pending handle to a settled state.
    ///
    /// Returns false if the handle already reached a terminal state, which is
    /// the signal to suppress the continuation.
    pub(crate) fn try_settle(&self, outcome: OperationState) -> bool {
        debug_assert!(outcome.is_settled());
        self.transition(outcome)
    }

    fn transition(&self, next: OperationState) -> bool {
        let mut state = self.inner.state.lock();
        if state.can_transition_to(next) {
            *state = next;
            true
        } else {
            false
        }
    }

    /// Waits until the driving task is done.
    ///
    /// Completes once the continuation has run, the settlement was
    /// suppressed, or the task was aborted.
    pub async fn finished(&self) {
        let mut receiver = self.inner.finished.subscribe();
        let _ = receiver.wait_for(|done| *done).await;
    }

    /// Returns true if the driving task is done.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        *self.inner.finished.borrow()
    }

    pub(crate) fn mark_finished(&self) {
        self.inner.finished.send_replace(true);
    }

    /// Aborts the spawned task as soon as the token is cancelled.
    pub(crate) fn abort_on_cancel(&self, abort: AbortHandle) {
        let weak: Weak<HandleInner> = Arc::downgrade(&self.inner);
        self.inner.token.on_cancel(move |_| {
            abort.abort();
            if let Some(inner) = weak.upgrade() {
                inner.finished.send_replace(true);
            }
        });
    }
}

impl PartialEq for OperationHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for OperationHandle {}

impl fmt::Debug for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationHandle")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("state", &self.state())
            .finish()
    }
}

/// Marks the handle finished when the driving task ends, including by panic
/// or abort.
pub(crate) struct FinishGuard(pub(crate) OperationHandle);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if self.0.is_pending() {
            warn!(
                operation_id = %self.0.id(),
                label = %self.0.label(),
                "Operation task ended before settling"
            );
        }
        self.0.mark_finished();
    }
}

/// The code to run when a live operation settles.
///
/// Built from plain closures captured at registration time. It runs at most
/// once and never after the handle has been cancelled.
pub struct Continuation<T, E> {
    on_settle: Box<dyn FnOnce(Result<T, E>) + Send>,
}

impl<T, E> Continuation<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Creates a continuation from separate success and failure callbacks.
    pub fn new<R, J>(on_resolve: R, on_reject: J) -> Self
    where
        R: FnOnce(T) + Send + 'static,
        J: FnOnce(E) + Send + 'static,
    {
        Self::from_fn(move |outcome| match outcome {
            Ok(value) => on_resolve(value),
            Err(error) => on_reject(error),
        })
    }

    /// Creates a continuation from a single callback receiving the outcome.
    pub fn from_fn<F>(on_settle: F) -> Self
    where
        F: FnOnce(Result<T, E>) + Send + 'static,
    {
        Self {
            on_settle: Box::new(on_settle),
        }
    }

    /// A continuation that discards the outcome.
    #[must_use]
    pub fn ignore() -> Self {
        Self::from_fn(|_| {})
    }

    /// Runs the continuation, logging and suppressing panics.
    pub(crate) fn invoke(self, outcome: Result<T, E>) {
        let on_settle = self.on_settle;
        if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            on_settle(outcome);
        })) {
            warn!("Operation continuation panicked: {:?}", e);
        }
    }
}

impl<T, E> fmt::Debug for Continuation<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_new_handle_is_pending() {
        let handle = OperationHandle::new("change_quantity");
        assert_eq!(handle.state(), OperationState::Pending);
        assert_eq!(handle.label(), "change_quantity");
        assert!(!handle.is_finished());
        assert!(!handle.token().is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let handle = OperationHandle::new("op");
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        handle.token().on_cancel(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(handle.cancel());
        assert!(!handle.cancel());

        assert_eq!(handle.state(), OperationState::Cancelled);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(handle.token().reason(), Some(CancelReason::Caller));
    }

    #[test]
    fn test_settle_after_cancel_is_refused() {
        let handle = OperationHandle::new("op");
        handle.cancel();
        assert!(!handle.try_settle(OperationState::Resolved));
        assert_eq!(handle.state(), OperationState::Cancelled);
    }

    #[test]
    fn test_cancel_after_settle_is_noop() {
        let handle = OperationHandle::new("op");
        assert!(handle.try_settle(OperationState::Rejected));
        assert!(!handle.cancel());
        assert_eq!(handle.state(), OperationState::Rejected);
        assert!(!handle.token().is_cancelled());
    }

    #[test]
    fn test_clones_share_identity() {
        let handle = OperationHandle::new("op");
        let clone = handle.clone();
        clone.cancel();
        assert_eq!(handle, clone);
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_finished_after_mark() {
        let handle = OperationHandle::new("op");
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.finished().await });

        handle.mark_finished();
        task.await.unwrap();
        assert!(handle.is_finished());
    }

    #[test]
    fn test_finish_guard_marks_finished() {
        let handle = OperationHandle::new("op");
        {
            let _guard = FinishGuard(handle.clone());
        }
        assert!(handle.is_finished());
    }

    #[test]
    fn test_continuation_routes_outcomes() {
        let resolved = Arc::new(AtomicUsize::new(0));
        let rejected = Arc::new(AtomicUsize::new(0));

        let r = resolved.clone();
        let j = rejected.clone();
        let continuation: Continuation<u32, String> = Continuation::new(
            move |v| {
                r.fetch_add(v as usize, Ordering::SeqCst);
            },
            move |_| {
                j.fetch_add(1, Ordering::SeqCst);
            },
        );
        continuation.invoke(Ok(3));

        assert_eq!(resolved.load(Ordering::SeqCst), 3);
        assert_eq!(rejected.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_continuation_panic_suppressed() {
        let continuation: Continuation<(), ()> = Continuation::from_fn(|_| panic!("boom"));
        continuation.invoke(Ok(()));
    }
}
