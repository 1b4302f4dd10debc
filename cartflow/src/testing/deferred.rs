//! Operations whose outcome is decided by the test.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use tokio::sync::oneshot;

/// Settles the operation created alongside it by [`deferred`].
pub struct Resolver<T, E> {
    sender: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Resolver<T, E> {
    /// Completes the operation successfully.
    pub fn resolve(self, value: T) {
        let _ = self.sender.send(Ok(value));
    }

    /// Completes the operation with `error`.
    pub fn reject(self, error: E) {
        let _ = self.sender.send(Err(error));
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

/// Creates an operation that completes when its [`Resolver`] says so.
///
/// Dropping the resolver leaves the operation pending forever.
#[must_use]
pub fn deferred<T, E>() -> (Resolver<T, E>, BoxFuture<'static, Result<T, E>>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let operation = async move {
        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => std::future::pending().await,
        }
    }
    .boxed();

    (Resolver { sender }, operation)
}
