//! Presentation trees for storefront components.
//!
//! Components implement [`Renderable`] and produce a [`ViewTree`], a plain
//! value the host turns into markup; it can be inspected in tests or
//! serialized with serde.

mod compare;
mod price;
mod tree;

pub use compare::{ProductCompareAttributeRow, MISSING_VALUE};
pub use price::{format_price, round_price, CartItemPrice};
pub use tree::{Renderable, ViewTree};
