//! Cancellable operation tracking.
//!
//! A session owns an [`OperationRegistry`]. Every asynchronous operation the
//! session starts is registered there and gets an [`OperationHandle`]. When
//! the session ends, [`OperationRegistry::teardown`] cancels whatever is
//! still pending: those operations may still run to completion, but their
//! continuations never fire.
//!
//! ```rust,ignore
//! let registry = OperationRegistry::default();
//! let tracked = registry.track("remove_item", backend.remove_item(42));
//!
//! // Later, when the owning view goes away:
//! registry.teardown();
//! assert!(tracked.settled().await.is_cancelled());
//! ```

mod handle;
mod loading;
mod registry;
mod settlement;
mod state;

pub use handle::{Continuation, OperationHandle};
pub use loading::{LoadingObserver, LoadingState};
pub use registry::{OperationRegistry, SessionState, TeardownReport};
pub use settlement::{Settlement, Tracked};
pub use state::{OperationId, OperationState};
