//! URL resolution query.

use super::builder::{Field, Query};

/// Resolves a storefront URL to the entity behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlRewritesQuery;

impl UrlRewritesQuery {
    /// Builds the `urlResolver` query for `url`.
    #[must_use]
    pub fn query(url: &str) -> Query {
        Query::new("urlResolver")
            .add_argument("url", "String!", url)
            .add_field_list(Self::fields())
    }

    fn fields() -> Vec<Field> {
        vec![Field::new("sku"), Field::new("type"), Field::new("id")]
    }
}
