//! One attribute row of the product comparison table.

use super::tree::{Renderable, ViewTree};
use serde::{Deserialize, Serialize};

/// Shown for a product that lacks the attribute.
pub const MISSING_VALUE: &str = "\u{2014}";

/// An attribute and its value for each compared product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCompareAttributeRow {
    /// Attribute label.
    pub title: String,
    /// Value HTML per product; `None` when the product lacks the attribute.
    #[serde(default)]
    pub values: Vec<Option<String>>,
    /// Render the mobile layout.
    #[serde(default)]
    pub is_mobile: bool,
}

impl ProductCompareAttributeRow {
    /// Creates a row.
    #[must_use]
    pub fn new(title: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            title: title.into(),
            values,
            is_mobile: false,
        }
    }

    /// Sets the mobile layout flag.
    #[must_use]
    pub fn with_mobile(mut self, is_mobile: bool) -> Self {
        self.is_mobile = is_mobile;
        self
    }

    fn render_title(&self) -> ViewTree {
        ViewTree::element("title").with_child(ViewTree::text(self.title.clone()))
    }

    fn render_value(index: usize, value: Option<&str>) -> ViewTree {
        let content = match value {
            Some(html) => ViewTree::raw_html(html),
            None => ViewTree::text(MISSING_VALUE),
        };

        ViewTree::element("value")
            .with_attribute("index", index.to_string())
            .with_child(content)
    }

    fn render_values(&self) -> ViewTree {
        let values: Vec<ViewTree> = self
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| Self::render_value(index, value.as_deref()))
            .collect();

        if !self.is_mobile {
            return ViewTree::fragment(values);
        }

        values
            .into_iter()
            .fold(ViewTree::element("values"), ViewTree::with_child)
    }
}

impl Renderable for ProductCompareAttributeRow {
    fn render(&self) -> ViewTree {
        ViewTree::element("attribute_row")
            .with_child(self.render_title())
            .with_child(self.render_values())
    }
}
