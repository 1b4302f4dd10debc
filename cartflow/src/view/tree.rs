//! The view tree and the capability of producing one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Something that can be rendered.
pub trait Renderable {
    /// Produces the view of `self`.
    fn render(&self) -> ViewTree;
}

/// A rendered node.
///
/// Element names identify the role of a node (`price`, `title`, `value`);
/// turning the tree into markup is left to the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewTree {
    /// A named element with attributes and children.
    Element {
        /// Role of the node.
        name: String,
        /// Attributes, sorted by name.
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        /// Child nodes.
        #[serde(default)]
        children: Vec<ViewTree>,
    },
    /// Plain text.
    Text {
        /// The text.
        content: String,
    },
    /// Pre-rendered HTML the host inserts as is.
    RawHtml {
        /// The markup.
        content: String,
    },
    /// Renders nothing.
    #[default]
    Empty,
    /// Children without a wrapping element.
    Fragment {
        /// Child nodes.
        children: Vec<ViewTree>,
    },
}

impl ViewTree {
    /// Creates an element without attributes or children.
    #[must_use]
    pub fn element(name: impl Into<String>) -> Self {
        Self::Element {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates a text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Creates a raw HTML node.
    #[must_use]
    pub fn raw_html(content: impl Into<String>) -> Self {
        Self::RawHtml {
            content: content.into(),
        }
    }

    /// Creates a fragment.
    #[must_use]
    pub fn fragment(children: Vec<ViewTree>) -> Self {
        Self::Fragment { children }
    }

    /// Sets an attribute. No effect on anything but elements.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attributes, .. } = &mut self {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Appends a child. Empty children are skipped.
    #[must_use]
    pub fn with_child(mut self, child: ViewTree) -> Self {
        if child.is_empty() {
            return self;
        }
        match &mut self {
            Self::Element { children, .. } | Self::Fragment { children } => children.push(child),
            _ => {}
        }
        self
    }

    /// Returns true for [`ViewTree::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the element name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the value of an element attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            Self::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    /// Returns the children of an element or fragment.
    #[must_use]
    pub fn children(&self) -> &[ViewTree] {
        match self {
            Self::Element { children, .. } | Self::Fragment { children } => children,
            _ => &[],
        }
    }

    /// Finds the first element named `name`, depth first, `self` included.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ViewTree> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(name))
    }

    /// Concatenates every text and raw HTML node below `self`.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Text { content } | Self::RawHtml { content } => content.clone(),
            Self::Empty => String::new(),
            Self::Element { children, .. } | Self::Fragment { children } => {
                children.iter().map(Self::text_content).collect()
            }
        }
    }
}
