//! Properties derived from a cart item for presentation.

use super::model::{
    CartItem, Product, ProductType, StockStatus, DEFAULT_MAX_SALE_QUANTITY,
    DEFAULT_MIN_SALE_QUANTITY,
};
use crate::config::CartItemConfig;
use crate::utils::object_to_uri;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a cart item links to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductLink {
    /// Product page path; `None` when the item cannot be linked.
    pub pathname: Option<String>,
    /// Search string selecting the configured variant (`?size=42`).
    #[serde(default)]
    pub search: String,
    /// Product passed along as navigation state.
    #[serde(default)]
    pub product: Option<Product>,
}

impl ProductLink {
    /// Returns true if there is nothing to link to.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pathname.is_none()
    }

    /// Returns the full target (`pathname` + `search`).
    #[must_use]
    pub fn href(&self) -> Option<String> {
        self.pathname
            .as_ref()
            .map(|pathname| format!("{pathname}{}", self.search))
    }
}

/// Everything a cart item view needs, computed from the item and session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemView {
    /// The item.
    pub item: CartItem,
    /// Currency prices are shown in.
    pub currency_code: String,
    /// Cart is in edit mode.
    pub is_editing: bool,
    /// Item shown in the cart overlay.
    pub is_cart_overlay: bool,
    /// Device is mobile.
    pub is_mobile: bool,
    /// An operation of the session is in flight.
    pub is_loading: bool,
    /// Loader should be shown while loading.
    pub show_loader: bool,
    /// Product link.
    pub link_to: ProductLink,
    /// Thumbnail URL, empty when none.
    pub thumbnail: String,
    /// Smallest orderable quantity.
    pub min_sale_quantity: u32,
    /// Largest orderable quantity.
    pub max_sale_quantity: u32,
    /// Product can be bought.
    pub is_product_in_stock: bool,
    /// Labels of the selected configurable options.
    pub option_labels: Vec<String>,
    /// Mobile layout applies (mobile device or cart overlay).
    pub is_mobile_layout: bool,
}

impl CartItemView {
    /// Computes the view of `item`.
    #[must_use]
    pub fn build(item: &CartItem, config: &CartItemConfig, is_loading: bool) -> Self {
        let current = current_product(item);

        Self {
            item: item.clone(),
            currency_code: config.currency_code.clone(),
            is_editing: config.is_editing,
            is_cart_overlay: config.is_cart_overlay,
            is_mobile: config.is_mobile,
            is_loading,
            show_loader: config.show_loader,
            link_to: product_link(item),
            thumbnail: thumbnail(current),
            min_sale_quantity: min_sale_quantity(current),
            max_sale_quantity: max_sale_quantity(current),
            is_product_in_stock: is_in_stock(&item.product),
            option_labels: option_labels(item),
            is_mobile_layout: config.is_mobile || config.is_cart_overlay,
        }
    }
}

/// Index of the variant the item refers to.
///
/// A variant matches when its SKU equals the item SKU or is contained in it.
#[must_use]
pub fn variant_index(item: &CartItem) -> Option<usize> {
    item.product.variants.iter().position(|variant| {
        !variant.sku.is_empty() && (variant.sku == item.sku || item.sku.contains(&variant.sku))
    })
}

/// The variant the item refers to, if any.
#[must_use]
pub fn product_variant(item: &CartItem) -> Option<&Product> {
    variant_index(item).map(|index| &item.product.variants[index])
}

/// The matching variant, or the product itself.
#[must_use]
pub fn current_product(item: &CartItem) -> &Product {
    product_variant(item).unwrap_or(&item.product)
}

/// Builds the link to the item's product page.
///
/// Configurable products link to the parent page with the variant's option
/// values in the search string; without a matching variant there is no link.
#[must_use]
pub fn product_link(item: &CartItem) -> ProductLink {
    let product = &item.product;

    if product.type_id != ProductType::Configurable {
        return ProductLink {
            pathname: Some(product.url.clone()),
            search: String::new(),
            product: Some(product.clone()),
        };
    }

    let Some(variant) = product_variant(item) else {
        return ProductLink::default();
    };

    let parameters: BTreeMap<String, String> = variant
        .attributes
        .iter()
        .filter(|(code, _)| product.configurable_options.contains_key(*code))
        .filter_map(|(code, attribute)| {
            attribute
                .attribute_value
                .as_ref()
                .map(|value| (code.clone(), value.clone()))
        })
        .collect();

    let state_product = product
        .parent
        .as_deref()
        .cloned()
        .unwrap_or_else(|| product.clone());

    ProductLink {
        pathname: Some(product.url.clone()),
        search: object_to_uri(&parameters),
        product: Some(state_product),
    }
}

/// Thumbnail URL of `product`, or an empty string.
#[must_use]
pub fn thumbnail(product: &Product) -> String {
    product
        .thumbnail
        .as_ref()
        .map(|image| image.url.clone())
        .unwrap_or_default()
}

/// Smallest quantity of `product` that can be ordered.
#[must_use]
pub fn min_sale_quantity(product: &Product) -> u32 {
    product
        .stock_item
        .as_ref()
        .and_then(|stock| stock.min_sale_qty)
        .filter(|qty| *qty > 0)
        .unwrap_or(DEFAULT_MIN_SALE_QUANTITY)
}

/// Largest quantity of `product` that can be ordered.
///
/// Never less than the minimum.
#[must_use]
pub fn max_sale_quantity(product: &Product) -> u32 {
    let max = product
        .stock_item
        .as_ref()
        .and_then(|stock| stock.max_sale_qty)
        .unwrap_or(DEFAULT_MAX_SALE_QUANTITY);
    max.max(min_sale_quantity(product))
}

/// Whether `product` can be bought.
///
/// Unknown stock counts as available. A configurable product additionally
/// needs at least one available variant, when it lists any.
#[must_use]
pub fn is_in_stock(product: &Product) -> bool {
    let own = product.stock_status != Some(StockStatus::OutOfStock);

    if product.type_id == ProductType::Configurable && !product.variants.is_empty() {
        return own
            && product
                .variants
                .iter()
                .any(|variant| variant.stock_status != Some(StockStatus::OutOfStock));
    }

    own
}

/// Labels of the configurable options selected by the item.
///
/// Attributes that are not configurable options, have no value, or whose
/// value has no label are skipped.
#[must_use]
pub fn option_labels(item: &CartItem) -> Vec<String> {
    let options = &item.product.configurable_options;
    if options.is_empty() {
        return Vec::new();
    }

    current_product(item)
        .attributes
        .iter()
        .filter(|(key, _)| options.contains_key(*key))
        .filter_map(|(_, attribute)| {
            let value = attribute.attribute_value.as_ref()?;
            options
                .get(&attribute.attribute_code)?
                .attribute_options
                .get(value)
                .map(|option| option.label.clone())
        })
        .filter(|label| !label.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::model::{
        AttributeOption, ConfigurableOption, Image, ProductAttribute, StockItem,
    };
    use pretty_assertions::assert_eq;

    fn attribute(code: &str, value: Option<&str>) -> (String, ProductAttribute) {
        (
            code.to_string(),
            ProductAttribute {
                attribute_code: code.to_string(),
                attribute_value: value.map(String::from),
            },
        )
    }

    fn option(code: &str, values: &[(&str, &str)]) -> (String, ConfigurableOption) {
        (
            code.to_string(),
            ConfigurableOption {
                attribute_code: code.to_string(),
                attribute_label: code.to_string(),
                attribute_options: values
                    .iter()
                    .map(|(value, label)| {
                        (
                            (*value).to_string(),
                            AttributeOption {
                                label: (*label).to_string(),
                                value: (*value).to_string(),
                            },
                        )
                    })
                    .collect(),
            },
        )
    }

    fn configurable_item() -> CartItem {
        let variant_small = Product {
            sku: "tee-s".to_string(),
            thumbnail: Some(Image {
                url: "/media/tee-s.jpg".to_string(),
                label: None,
            }),
            attributes: [attribute("size", Some("10")), attribute("material", Some("cotton"))]
                .into_iter()
                .collect(),
            ..Product::default()
        };
        let variant_large = Product {
            sku: "tee-l".to_string(),
            stock_item: Some(StockItem {
                min_sale_qty: Some(2),
                max_sale_qty: Some(5),
                qty_increments: None,
            }),
            attributes: [attribute("size", Some("12"))].into_iter().collect(),
            ..Product::default()
        };

        let product = Product {
            sku: "tee".to_string(),
            type_id: ProductType::Configurable,
            url: "/tee.html".to_string(),
            variants: vec![variant_small, variant_large],
            configurable_options: [option("size", &[("10", "S"), ("12", "L")])]
                .into_iter()
                .collect(),
            ..Product::default()
        };

        CartItem::new(1, product).with_sku("tee-l")
    }

    #[test]
    fn test_variant_index_exact_and_contained() {
        let item = configurable_item();
        assert_eq!(variant_index(&item), Some(1));

        let item = configurable_item().with_sku("tee-s-custom");
        assert_eq!(variant_index(&item), Some(0));

        let item = configurable_item().with_sku("hoodie");
        assert_eq!(variant_index(&item), None);
        assert_eq!(current_product(&item).sku, "tee");
    }

    #[test]
    fn test_simple_product_link() {
        let product = Product {
            sku: "mug".to_string(),
            url: "/mug.html".to_string(),
            ..Product::default()
        };
        let item = CartItem::new(2, product);
        let link = product_link(&item);

        assert_eq!(link.href().as_deref(), Some("/mug.html"));
        assert_eq!(link.product.unwrap().sku, "mug");
    }

    #[test]
    fn test_configurable_link_uses_variant_options() {
        let item = configurable_item().with_sku("tee-s");
        let link = product_link(&item);

        // `material` is not a configurable option and stays out of the search.
        assert_eq!(link.search, "?size=10");
        assert_eq!(link.href().as_deref(), Some("/tee.html?size=10"));
        assert_eq!(link.product.unwrap().sku, "tee");
    }

    #[test]
    fn test_configurable_link_prefers_parent_state() {
        let mut item = configurable_item();
        item.product.parent = Some(Box::new(Product {
            sku: "tee-parent".to_string(),
            ..Product::default()
        }));

        let link = product_link(&item);
        assert_eq!(link.product.unwrap().sku, "tee-parent");
    }

    #[test]
    fn test_configurable_without_variant_has_no_link() {
        let item = configurable_item().with_sku("unknown");
        assert!(product_link(&item).is_empty());
    }

    #[test]
    fn test_thumbnail_and_quantities_follow_variant() {
        let small = configurable_item().with_sku("tee-s");
        assert_eq!(thumbnail(current_product(&small)), "/media/tee-s.jpg");
        assert_eq!(min_sale_quantity(current_product(&small)), 1);
        assert_eq!(max_sale_quantity(current_product(&small)), 999);

        let large = configurable_item();
        assert_eq!(thumbnail(current_product(&large)), "");
        assert_eq!(min_sale_quantity(current_product(&large)), 2);
        assert_eq!(max_sale_quantity(current_product(&large)), 5);
    }

    #[test]
    fn test_max_never_below_min() {
        let product = Product {
            stock_item: Some(StockItem {
                min_sale_qty: Some(6),
                max_sale_qty: Some(3),
                qty_increments: None,
            }),
            ..Product::default()
        };
        assert_eq!(max_sale_quantity(&product), 6);
    }

    #[test]
    fn test_stock_status() {
        let mut item = configurable_item();
        assert!(is_in_stock(&item.product));

        for variant in &mut item.product.variants {
            variant.stock_status = Some(StockStatus::OutOfStock);
        }
        assert!(!is_in_stock(&item.product));

        let simple = Product {
            stock_status: Some(StockStatus::OutOfStock),
            ..Product::default()
        };
        assert!(!is_in_stock(&simple));
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(option_labels(&configurable_item()), vec!["L".to_string()]);
        assert_eq!(
            option_labels(&configurable_item().with_sku("tee-s")),
            vec!["S".to_string()]
        );
    }

    #[test]
    fn test_option_labels_skip_missing_values() {
        let mut item = configurable_item();
        item.product.variants[1]
            .attributes
            .insert("size".to_string(), attribute("size", None).1);
        assert!(option_labels(&item).is_empty());

        let mut item = configurable_item();
        item.product.variants[1]
            .attributes
            .insert("size".to_string(), attribute("size", Some("99")).1);
        assert!(option_labels(&item).is_empty());
    }

    #[test]
    fn test_view_build() {
        let config = CartItemConfig::new().with_cart_overlay(true);
        let view = CartItemView::build(&configurable_item(), &config, true);

        assert!(view.is_loading);
        assert!(view.is_mobile_layout);
        assert!(!view.is_mobile);
        assert_eq!(view.currency_code, "USD");
        assert_eq!(view.option_labels, vec!["L".to_string()]);
        assert_eq!(view.min_sale_quantity, 2);
        assert_eq!(view.link_to.search, "?size=12");
    }
}
