//! Cart item session: quantity changes and removals tied to a view's lifetime.

use super::backend::CartMutations;
use super::model::{CartItem, CartMutationResult, ChangeQuantityRequest};
use super::view_model::CartItemView;
use crate::config::{CartItemConfig, TrackerConfig};
use crate::errors::CartError;
use crate::events::{default_sink, EventSink};
use crate::tracker::{
    LoadingObserver, LoadingState, OperationRegistry, SessionState, Settlement,
    TeardownReport, Tracked,
};
use crate::utils::encode_base64;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// The session of one mounted cart line item.
///
/// Owns the registry of the item's in-flight cart mutations and its loading
/// flag. [`start`](Self::start) and [`end`](Self::end) are driven by the
/// host's mount and unmount events; after `end`, no mutation result reaches
/// the session or its loading observer. Dropping the session ends it.
pub struct CartItemSession {
    item: Arc<RwLock<CartItem>>,
    config: CartItemConfig,
    backend: Arc<dyn CartMutations>,
    registry: Arc<OperationRegistry>,
    loading: LoadingState,
    sink: Arc<dyn EventSink>,
    ended: AtomicBool,
}

impl CartItemSession {
    /// Creates an active session for `item`.
    #[must_use]
    pub fn new(item: CartItem, backend: Arc<dyn CartMutations>, config: CartItemConfig) -> Self {
        Self {
            item: Arc::new(RwLock::new(item)),
            config,
            backend,
            registry: Arc::new(OperationRegistry::default()),
            loading: LoadingState::new(),
            sink: default_sink(),
            ended: AtomicBool::new(false),
        }
    }

    /// Reports loading flag changes to `observer`.
    #[must_use]
    pub fn with_loading_observer(mut self, observer: Arc<dyn LoadingObserver>) -> Self {
        self.loading = LoadingState::with_observer(observer);
        self
    }

    /// Replaces the tracker configuration.
    #[must_use]
    pub fn with_tracker_config(mut self, config: TrackerConfig) -> Self {
        self.registry =
            Arc::new(OperationRegistry::new(config).with_event_sink(self.sink.clone()));
        self
    }

    /// Sends session and operation events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.registry = Arc::new(
            OperationRegistry::new(self.registry.config().clone()).with_event_sink(sink.clone()),
        );
        self.sink = sink;
        self
    }

    /// Session start: publishes the initial (idle) loading state.
    pub fn start(&self) {
        let item_id = self.item.read().item_id;
        debug!(item_id, "Cart item session started");
        self.loading.publish();
        self.sink
            .try_emit("session.started", Some(serde_json::json!({ "item_id": item_id })));
    }

    /// Session end: silences the loading observer and cancels every pending
    /// operation.
    ///
    /// The observer hears `false` once if the item was loading. Safe to call
    /// more than once; later calls return an empty report.
    pub fn end(&self) -> TeardownReport {
        if self.ended.swap(true, Ordering::SeqCst) {
            return TeardownReport::default();
        }

        self.loading.shutdown();
        let report = self.registry.teardown();

        let item_id = self.item.read().item_id;
        debug!(item_id, cancelled = report.cancelled, "Cart item session ended");
        self.sink.try_emit(
            "session.ended",
            Some(serde_json::json!({
                "item_id": item_id,
                "cancelled": report.cancelled,
            })),
        );

        report
    }

    /// Requests a new quantity for the item.
    ///
    /// Returns `None` without contacting the backend when `quantity` equals
    /// the current quantity. Otherwise the loading flag is set, the change is
    /// sent, and the flag is cleared when the backend answers. A successful
    /// change updates the item's quantity.
    pub fn change_quantity(&self, quantity: u32) -> Option<Tracked<CartMutationResult, CartError>> {
        let (item_id, current) = {
            let item = self.item.read();
            (item.item_id, item.qty)
        };

        if quantity == current {
            debug!(item_id, quantity, "Quantity unchanged; nothing to send");
            return None;
        }

        self.loading.begin();

        let request = ChangeQuantityRequest {
            uid: encode_base64(item_id.to_string()),
            quantity,
            cart_id: self.config.cart_id.clone(),
        };
        let backend = Arc::clone(&self.backend);
        let item = Arc::clone(&self.item);
        let loading = self.loading.clone();

        info!(item_id, from = current, to = quantity, "Changing cart item quantity");
        Some(self.registry.track_with(
            "change_quantity",
            async move { backend.change_quantity(request).await },
            move |outcome| {
                match outcome {
                    Ok(_) => item.write().qty = quantity,
                    Err(error) => warn!(item_id, %error, "Quantity change failed"),
                }
                loading.finish();
            },
        ))
    }

    /// Removes the item, then refreshes related items if configured.
    ///
    /// The whole chain is one tracked operation: the loading flag stays set
    /// until the removal and, when `cascade_on_remove` is on, the related
    /// items update have both settled. The update only starts after the
    /// removal succeeded and receives the items the removal returned.
    pub fn remove_item(&self) -> Tracked<CartMutationResult, CartError> {
        let item_id = self.item.read().item_id;
        self.loading.begin();

        let chain = remove_and_cascade(
            Arc::downgrade(&self.registry),
            Arc::clone(&self.backend),
            item_id,
            self.config.cascade_on_remove,
        );
        let loading = self.loading.clone();

        info!(item_id, cascade = self.config.cascade_on_remove, "Removing cart item");
        self.registry.track_with("remove_item_chain", chain, move |outcome| {
            if let Err(error) = outcome {
                warn!(item_id, %error, "Cart item removal failed");
            }
            loading.finish();
        })
    }

    /// Returns a copy of the item.
    #[must_use]
    pub fn item(&self) -> CartItem {
        self.item.read().clone()
    }

    /// Replaces the item, e.g. after the cart was refreshed elsewhere.
    pub fn update_item(&self, item: CartItem) {
        *self.item.write() = item;
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CartItemConfig {
        &self.config
    }

    /// Returns the last known loading flag.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Returns the session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.registry.state()
    }

    /// Returns the registry of the session's operations.
    #[must_use]
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Computes the presentation properties of the item.
    #[must_use]
    pub fn view(&self) -> CartItemView {
        CartItemView::build(&self.item.read(), &self.config, self.is_loading())
    }
}

impl Drop for CartItemSession {
    fn drop(&mut self) {
        self.end();
    }
}

impl fmt::Debug for CartItemSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartItemSession")
            .field("item_id", &self.item.read().item_id)
            .field("loading", &self.loading)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

async fn remove_and_cascade(
    registry: Weak<OperationRegistry>,
    backend: Arc<dyn CartMutations>,
    item_id: u64,
    cascade: bool,
) -> Result<CartMutationResult, CartError> {
    let removal = {
        let Some(registry) = registry.upgrade() else {
            return Err(CartError::interrupted("remove_item"));
        };
        let backend = Arc::clone(&backend);
        registry.track("remove_item", async move { backend.remove_item(item_id).await })
    };

    let result = match removal.settled().await {
        Settlement::Resolved(result) => result,
        Settlement::Rejected(error) => return Err(error),
        Settlement::Cancelled => return Err(CartError::interrupted("remove_item")),
    };

    if !cascade {
        return Ok(result);
    }

    let update = {
        let Some(registry) = registry.upgrade() else {
            return Err(CartError::interrupted("update_related_items"));
        };
        let items = result.related_items.clone();
        registry.track("update_related_items", async move {
            backend.update_related_items(items).await
        })
    };

    match update.settled().await {
        Settlement::Resolved(()) => Ok(result),
        Settlement::Rejected(error) => Err(error),
        Settlement::Cancelled => Err(CartError::interrupted("update_related_items")),
    }
}
