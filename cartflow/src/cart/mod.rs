//! Cart line item logic.
//!
//! A [`CartItemSession`] is the controller behind one rendered cart line
//! item. It changes the item's quantity, removes it (optionally refreshing
//! related items afterwards) and reports whether anything is in flight. All
//! of its backend calls go through the session's operation registry, so
//! nothing reaches the session once it has ended.

mod backend;
mod model;
mod session;
mod view_model;

pub use backend::CartMutations;
pub use model::{
    AttributeOption, CartItem, CartMutationResult, ChangeQuantityRequest, ConfigurableOption,
    Image, Product, ProductAttribute, ProductType, RelatedItem, StockItem, StockStatus,
    DEFAULT_MAX_SALE_QUANTITY, DEFAULT_MIN_SALE_QUANTITY,
};
pub use session::CartItemSession;
pub use view_model::{
    current_product, is_in_stock, max_sale_quantity, min_sale_quantity, option_labels,
    product_link, product_variant, thumbnail, variant_index, CartItemView, ProductLink,
};
