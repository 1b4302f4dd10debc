//! The cart mutation backend consumed by cart item sessions.

use super::model::{CartMutationResult, ChangeQuantityRequest, RelatedItem};
use crate::errors::CartError;
use async_trait::async_trait;

/// Remote cart mutations.
///
/// Implementations talk to the storefront backend. Every call may take
/// arbitrarily long; sessions track them and suppress their results once
/// the session has ended.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartMutations: Send + Sync {
    /// Changes the quantity of a cart item.
    async fn change_quantity(
        &self,
        request: ChangeQuantityRequest,
    ) -> Result<CartMutationResult, CartError>;

    /// Removes a cart item.
    async fn remove_item(&self, item_id: u64) -> Result<CartMutationResult, CartError>;

    /// Refreshes the products related to the given cart items.
    async fn update_related_items(&self, items: Vec<RelatedItem>) -> Result<(), CartError>;
}
