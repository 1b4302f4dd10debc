//! Cart line item domain model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum sale quantity used when a product does not declare one.
pub const DEFAULT_MAX_SALE_QUANTITY: u32 = 999;

/// Minimum sale quantity used when a product does not declare one.
pub const DEFAULT_MIN_SALE_QUANTITY: u32 = 1;

/// Product types known to the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// A single sellable product.
    #[default]
    Simple,
    /// A product with selectable variants.
    Configurable,
    /// A product made of selectable components.
    Bundle,
    /// A set of standalone products sold together.
    Grouped,
    /// A non-physical product.
    Virtual,
    /// A downloadable product.
    Downloadable,
}

/// Stock availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    /// Available for sale.
    InStock,
    /// Not available for sale.
    OutOfStock,
}

/// Inventory limits of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// Smallest quantity that can be ordered.
    #[serde(default)]
    pub min_sale_qty: Option<u32>,
    /// Largest quantity that can be ordered.
    #[serde(default)]
    pub max_sale_qty: Option<u32>,
    /// Increment quantities must follow.
    #[serde(default)]
    pub qty_increments: Option<u32>,
}

/// A product image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    #[serde(default)]
    pub url: String,
    /// Alternative text.
    #[serde(default)]
    pub label: Option<String>,
}

/// One attribute value carried by a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    /// Attribute code (e.g. `color`).
    pub attribute_code: String,
    /// Selected value id, if any.
    #[serde(default)]
    pub attribute_value: Option<String>,
}

/// One selectable value of a configurable option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOption {
    /// Human-readable label.
    pub label: String,
    /// Option value id.
    #[serde(default)]
    pub value: String,
}

/// A configurable option of a product (e.g. size).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableOption {
    /// Attribute code of the option.
    pub attribute_code: String,
    /// Option label.
    #[serde(default)]
    pub attribute_label: String,
    /// Selectable values keyed by value id.
    #[serde(default)]
    pub attribute_options: BTreeMap<String, AttributeOption>,
}

/// A product or product variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id.
    #[serde(default)]
    pub id: u64,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Product type.
    #[serde(default)]
    pub type_id: ProductType,
    /// Product page URL.
    #[serde(default)]
    pub url: String,
    /// Thumbnail image.
    #[serde(default)]
    pub thumbnail: Option<Image>,
    /// Stock availability; unknown means available.
    #[serde(default)]
    pub stock_status: Option<StockStatus>,
    /// Inventory limits.
    #[serde(default)]
    pub stock_item: Option<StockItem>,
    /// Variants of a configurable product.
    #[serde(default)]
    pub variants: Vec<Product>,
    /// Configurable options keyed by attribute code.
    #[serde(default)]
    pub configurable_options: BTreeMap<String, ConfigurableOption>,
    /// Attribute values keyed by attribute code.
    #[serde(default)]
    pub attributes: BTreeMap<String, ProductAttribute>,
    /// Parent product of a variant.
    #[serde(default)]
    pub parent: Option<Box<Product>>,
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart item id.
    pub item_id: u64,
    /// SKU of the chosen product or variant.
    #[serde(default)]
    pub sku: String,
    /// Quantity in the cart.
    #[serde(default = "default_qty")]
    pub qty: u32,
    /// Row total in the cart currency.
    #[serde(default)]
    pub row_total: f64,
    /// The product the item refers to.
    #[serde(default)]
    pub product: Product,
}

fn default_qty() -> u32 {
    1
}

impl CartItem {
    /// Creates an item for `product` with quantity 1.
    #[must_use]
    pub fn new(item_id: u64, product: Product) -> Self {
        Self {
            item_id,
            sku: product.sku.clone(),
            qty: default_qty(),
            row_total: 0.0,
            product,
        }
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self
    }

    /// Sets the item SKU.
    #[must_use]
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }
}

/// An item the cart reports back after a mutation.
///
/// Used to refresh the related (cross-sell) products shown alongside the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedItem {
    /// Cart item id.
    pub item_id: u64,
    /// Product SKU.
    pub sku: String,
    /// Quantity in the cart.
    #[serde(default)]
    pub qty: u32,
}

/// Successful result of a cart mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartMutationResult {
    /// Cart the mutation applied to.
    #[serde(default)]
    pub cart_id: String,
    /// Items remaining in the cart.
    #[serde(default)]
    pub related_items: Vec<RelatedItem>,
    /// Total quantity in the cart.
    #[serde(default)]
    pub items_qty: u32,
}

/// Arguments of a quantity change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeQuantityRequest {
    /// Base64-encoded cart item id.
    pub uid: String,
    /// Requested quantity.
    pub quantity: u32,
    /// Cart id.
    pub cart_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_defaults_from_json() {
        let item: CartItem = serde_json::from_str(r#"{"item_id": 3}"#).unwrap();
        assert_eq!(item.qty, 1);
        assert_eq!(item.product.type_id, ProductType::Simple);
        assert!(item.product.variants.is_empty());
    }

    #[test]
    fn test_stock_status_wire_names() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, r#""OUT_OF_STOCK""#);
        let parsed: StockStatus = serde_json::from_str(r#""IN_STOCK""#).unwrap();
        assert_eq!(parsed, StockStatus::InStock);
    }

    #[test]
    fn test_cart_item_builder() {
        let product = Product {
            sku: "tee".to_string(),
            ..Product::default()
        };
        let item = CartItem::new(9, product).with_qty(4).with_sku("tee-red-m");

        assert_eq!(item.item_id, 9);
        assert_eq!(item.qty, 4);
        assert_eq!(item.sku, "tee-red-m");
    }
}
