//! Cart item price.

use super::tree::{Renderable, ViewTree};
use serde::{Deserialize, Serialize};

/// Rounds a price to two decimals.
///
/// ```
/// use cartflow::view::round_price;
///
/// assert_eq!(round_price(12.345_6), "12.35");
/// ```
#[must_use]
pub fn round_price(price: f64) -> String {
    format!("{:.2}", (price * 100.0).round() / 100.0)
}

/// Formats a price for display: two decimals followed by the currency code.
#[must_use]
pub fn format_price(price: f64, currency_code: &str) -> String {
    format!("{} {currency_code}", round_price(price))
}

/// The price shown on a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemPrice {
    /// Price including tax.
    pub price: f64,
    /// Price excluding tax, shown beneath when present and non-zero.
    #[serde(default)]
    pub sub_price: Option<f64>,
    /// Currency code.
    pub currency_code: String,
}

impl CartItemPrice {
    /// Creates a price without sub-price.
    #[must_use]
    pub fn new(price: f64, currency_code: impl Into<String>) -> Self {
        Self {
            price,
            sub_price: None,
            currency_code: currency_code.into(),
        }
    }

    /// Sets the price excluding tax.
    #[must_use]
    pub fn with_sub_price(mut self, sub_price: f64) -> Self {
        self.sub_price = Some(sub_price);
        self
    }

    fn render_price(&self) -> ViewTree {
        ViewTree::element("price")
            .with_attribute("value", round_price(self.price))
            .with_child(ViewTree::text(format_price(self.price, &self.currency_code)))
    }

    fn render_sub_price(&self) -> ViewTree {
        let Some(sub_price) = self.sub_price.filter(|value| value.abs() > f64::EPSILON) else {
            return ViewTree::Empty;
        };

        ViewTree::element("sub_price")
            .with_attribute("value", round_price(sub_price))
            .with_child(ViewTree::text(format!(
                "Excl. tax: {}",
                format_price(sub_price, &self.currency_code)
            )))
    }
}

impl Renderable for CartItemPrice {
    fn render(&self) -> ViewTree {
        ViewTree::element("product_price")
            .with_child(self.render_price())
            .with_child(self.render_sub_price())
    }
}
