//! Scripted collaborators for session tests.

use super::deferred::{deferred, Resolver};
use crate::cart::{CartMutationResult, CartMutations, ChangeQuantityRequest, RelatedItem};
use crate::errors::CartError;
use crate::tracker::LoadingObserver;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

/// A call received by [`ScriptedCartBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `change_quantity` with its request.
    ChangeQuantity(ChangeQuantityRequest),
    /// `remove_item` with the item id.
    RemoveItem(u64),
    /// `update_related_items` with the items.
    UpdateRelatedItems(Vec<RelatedItem>),
}

type MutationResolver = Resolver<CartMutationResult, CartError>;
type UpdateResolver = Resolver<(), CartError>;

/// A cart backend whose calls stay pending until the test settles them.
///
/// Every call is recorded. Quantity changes and removals hand their
/// [`Resolver`] to [`next_mutation`](Self::next_mutation); related item
/// updates hand theirs to [`next_update`](Self::next_update).
#[derive(Debug)]
pub struct ScriptedCartBackend {
    calls: Mutex<Vec<BackendCall>>,
    mutations_tx: mpsc::UnboundedSender<MutationResolver>,
    mutations_rx: AsyncMutex<mpsc::UnboundedReceiver<MutationResolver>>,
    updates_tx: mpsc::UnboundedSender<UpdateResolver>,
    updates_rx: AsyncMutex<mpsc::UnboundedReceiver<UpdateResolver>>,
}

impl ScriptedCartBackend {
    /// Creates a backend with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        let (mutations_tx, mutations_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            calls: Mutex::new(Vec::new()),
            mutations_tx,
            mutations_rx: AsyncMutex::new(mutations_rx),
            updates_tx,
            updates_rx: AsyncMutex::new(updates_rx),
        }
    }

    /// Returns the calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    /// Waits for the next quantity change or removal and returns its resolver.
    ///
    /// # Panics
    ///
    /// Panics if the backend's channel closed, which cannot happen while
    /// the backend is alive.
    pub async fn next_mutation(&self) -> MutationResolver {
        self.mutations_rx
            .lock()
            .await
            .recv()
            .await
            .expect("backend owns the mutation sender")
    }

    /// Waits for the next related items update and returns its resolver.
    ///
    /// # Panics
    ///
    /// Panics if the backend's channel closed, which cannot happen while
    /// the backend is alive.
    pub async fn next_update(&self) -> UpdateResolver {
        self.updates_rx
            .lock()
            .await
            .recv()
            .await
            .expect("backend owns the update sender")
    }

    async fn pending_mutation(&self, call: BackendCall) -> Result<CartMutationResult, CartError> {
        self.calls.lock().push(call);
        let (resolver, operation) = deferred();
        let _ = self.mutations_tx.send(resolver);
        operation.await
    }
}

impl Default for ScriptedCartBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartMutations for ScriptedCartBackend {
    async fn change_quantity(
        &self,
        request: ChangeQuantityRequest,
    ) -> Result<CartMutationResult, CartError> {
        self.pending_mutation(BackendCall::ChangeQuantity(request)).await
    }

    async fn remove_item(&self, item_id: u64) -> Result<CartMutationResult, CartError> {
        self.pending_mutation(BackendCall::RemoveItem(item_id)).await
    }

    async fn update_related_items(&self, items: Vec<RelatedItem>) -> Result<(), CartError> {
        self.calls.lock().push(BackendCall::UpdateRelatedItems(items));
        let (resolver, operation) = deferred();
        let _ = self.updates_tx.send(resolver);
        operation.await
    }
}

/// A loading observer that records every value it is given.
#[derive(Debug, Default)]
pub struct RecordingLoadingObserver {
    values: Mutex<Vec<bool>>,
}

impl RecordingLoadingObserver {
    /// Creates an observer with no recorded values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notified value, in order.
    #[must_use]
    pub fn values(&self) -> Vec<bool> {
        self.values.lock().clone()
    }

    /// Returns the most recent value.
    #[must_use]
    pub fn last(&self) -> Option<bool> {
        self.values.lock().last().copied()
    }

    /// Forgets the recorded values.
    pub fn clear(&self) {
        self.values.lock().clear();
    }
}

impl LoadingObserver for RecordingLoadingObserver {
    fn loading_changed(&self, is_loading: bool) {
        self.values.lock().push(is_loading);
    }
}
