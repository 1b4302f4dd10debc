//! # Cartflow
//!
//! Cancellable operation tracking for storefront views, and the cart line
//! item logic built on it.
//!
//! A view that starts asynchronous work must not be touched by that work
//! once it has gone away. Cartflow provides:
//!
//! - **Operation tracking**: a per-session registry of cancellable handles
//!   whose continuations are suppressed after cancellation
//! - **Loading state**: a flag with an observer that is silenced at teardown
//! - **Cart item sessions**: quantity changes and removals with an optional
//!   follow-up refresh of related items
//! - **Views and queries**: renderable price and comparison components, and
//!   a GraphQL request builder
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cartflow::prelude::*;
//!
//! let session = CartItemSession::new(item, backend, CartItemConfig::new())
//!     .with_loading_observer(Arc::new(|loading: bool| println!("loading: {loading}")));
//! session.start();
//!
//! let tracked = session.change_quantity(3);
//!
//! // The view unmounts before the backend answers:
//! session.end();
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod cart;
pub mod config;
pub mod errors;
pub mod events;
pub mod observability;
pub mod query;
pub mod testing;
pub mod tracker;
pub mod utils;
pub mod view;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::{CancelReason, CancellationToken};
    pub use crate::cart::{
        CartItem, CartItemSession, CartItemView, CartMutationResult, CartMutations,
        ChangeQuantityRequest, Product, RelatedItem,
    };
    pub use crate::config::{CartItemConfig, CartflowConfig, LoggingConfig, TrackerConfig};
    pub use crate::errors::{CartError, CartflowError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::observability::init_logging;
    pub use crate::query::{Field, GraphQlRequest, Query, UrlRewritesQuery};
    pub use crate::tracker::{
        Continuation, LoadingObserver, LoadingState, OperationHandle, OperationId,
        OperationRegistry, OperationState, SessionState, Settlement, TeardownReport, Tracked,
    };
    pub use crate::utils::{generate_uuid, Timestamp};
    pub use crate::view::{CartItemPrice, ProductCompareAttributeRow, Renderable, ViewTree};
}
