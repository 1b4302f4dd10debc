//! GraphQL request building.
//!
//! A [`Query`] is a tree of [`Field`]s. Arguments are never inlined: each one
//! is hoisted to a numbered variable when the request is built.

mod builder;
mod url_rewrites;

pub use builder::{Argument, Field, GraphQlRequest, OperationKind, Query};
pub use url_rewrites::UrlRewritesQuery;
