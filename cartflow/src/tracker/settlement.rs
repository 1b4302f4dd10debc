//! Awaitable outcomes of tracked operations.

use super::handle::OperationHandle;
use tokio::sync::oneshot;

/// How a tracked operation ended, as seen by the party awaiting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement<T, E> {
    /// The operation succeeded.
    Resolved(T),
    /// The operation failed; the error is passed through unchanged.
    Rejected(E),
    /// The handle was cancelled (or its task was dropped) before delivery.
    Cancelled,
}

impl<T, E> Settlement<T, E> {
    /// Returns true if the operation succeeded.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Returns true if the operation failed.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns true if delivery was suppressed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the success value, if any.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Converts into the delivered result, or `None` when suppressed.
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            Self::Resolved(value) => Some(Ok(value)),
            Self::Rejected(error) => Some(Err(error)),
            Self::Cancelled => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for Settlement<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Resolved(value),
            Err(error) => Self::Rejected(error),
        }
    }
}

/// A registered operation whose outcome can be awaited.
///
/// Dropping a `Tracked` does not cancel the operation; use
/// [`cancel`](Self::cancel) or tear the registry down.
#[derive(Debug)]
pub struct Tracked<T, E> {
    handle: OperationHandle,
    receiver: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> Tracked<T, E> {
    pub(crate) fn new(handle: OperationHandle, receiver: oneshot::Receiver<Result<T, E>>) -> Self {
        Self { handle, receiver }
    }

    /// Returns the handle of the underlying operation.
    #[must_use]
    pub fn handle(&self) -> &OperationHandle {
        &self.handle
    }

    /// Cancels the underlying operation.
    pub fn cancel(&self) -> bool {
        self.handle.cancel()
    }

    /// Waits for the outcome.
    pub async fn settled(self) -> Settlement<T, E> {
        match self.receiver.await {
            Ok(result) => result.into(),
            Err(_) => Settlement::Cancelled,
        }
    }

    /// Splits into the handle and the raw receiver.
    pub fn into_parts(self) -> (OperationHandle, oneshot::Receiver<Result<T, E>>) {
        (self.handle, self.receiver)
    }
}
