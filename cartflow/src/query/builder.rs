//! Fields, queries and the request they build.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// A field argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// GraphQL type of the argument (`String!`).
    pub type_name: String,
    /// Argument value.
    pub value: serde_json::Value,
}

/// A selected field with its arguments and sub-selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    alias: Option<String>,
    arguments: Vec<Argument>,
    children: Vec<Field>,
}

impl Field {
    /// Creates a field without arguments or sub-fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the alias the field is returned under.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Adds an argument.
    #[must_use]
    pub fn add_argument(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            type_name: type_name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a sub-field.
    #[must_use]
    pub fn add_field(mut self, field: impl Into<Field>) -> Self {
        self.children.push(field.into());
        self
    }

    /// Adds several sub-fields.
    #[must_use]
    pub fn add_field_list<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.children.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the sub-fields.
    #[must_use]
    pub fn children(&self) -> &[Field] {
        &self.children
    }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    fn write_selection(&self, out: &mut String, variables: &mut Variables) {
        if let Some(alias) = &self.alias {
            let _ = write!(out, "{alias}: ");
        }
        out.push_str(&self.name);

        if !self.arguments.is_empty() {
            let arguments: Vec<String> = self
                .arguments
                .iter()
                .map(|argument| {
                    let variable = variables.hoist(argument);
                    format!("{}: ${variable}", argument.name)
                })
                .collect();
            let _ = write!(out, "({})", arguments.join(", "));
        }

        if !self.children.is_empty() {
            out.push_str(" { ");
            for (index, child) in self.children.iter().enumerate() {
                if index > 0 {
                    out.push(' ');
                }
                child.write_selection(out, variables);
            }
            out.push_str(" }");
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Whether a request reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A read.
    #[default]
    Query,
    /// A write.
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// A root field sent as one GraphQL operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    kind: OperationKind,
    root: Field,
}

impl Query {
    /// Creates a query rooted at `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Query,
            root: Field::new(name),
        }
    }

    /// Creates a mutation rooted at `name`.
    #[must_use]
    pub fn mutation(name: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Mutation,
            root: Field::new(name),
        }
    }

    /// Sets the alias of the root field.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.root = self.root.alias(alias);
        self
    }

    /// Adds an argument to the root field.
    #[must_use]
    pub fn add_argument(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.root = self.root.add_argument(name, type_name, value);
        self
    }

    /// Adds a sub-field to the root field.
    #[must_use]
    pub fn add_field(mut self, field: impl Into<Field>) -> Self {
        self.root = self.root.add_field(field);
        self
    }

    /// Adds several sub-fields to the root field.
    #[must_use]
    pub fn add_field_list<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.root = self.root.add_field_list(fields);
        self
    }

    /// Returns the operation kind.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the root field.
    #[must_use]
    pub fn root(&self) -> &Field {
        &self.root
    }

    /// Builds the request document and its variables.
    ///
    /// Arguments are numbered in selection order, starting at 1:
    /// `urlResolver(url: "/x")` becomes `query($url_1: String!) {
    /// urlResolver(url: $url_1) }` with `{"url_1": "/x"}`.
    #[must_use]
    pub fn build(&self) -> GraphQlRequest {
        let mut variables = Variables::default();
        let mut selection = String::new();
        self.root.write_selection(&mut selection, &mut variables);

        let query = if variables.declarations.is_empty() {
            format!("{} {{ {selection} }}", self.kind)
        } else {
            format!(
                "{}({}) {{ {selection} }}",
                self.kind,
                variables.declarations.join(", ")
            )
        };

        GraphQlRequest {
            query,
            variables: variables.values,
        }
    }
}

/// A request ready to be posted to a GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    /// The document.
    pub query: String,
    /// Values of the declared variables.
    pub variables: serde_json::Map<String, serde_json::Value>,
}

#[derive(Default)]
struct Variables {
    counter: usize,
    declarations: Vec<String>,
    values: serde_json::Map<String, serde_json::Value>,
}

impl Variables {
    fn hoist(&mut self, argument: &Argument) -> String {
        self.counter += 1;
        let variable = format!("{}_{}", argument.name, self.counter);
        self.declarations
            .push(format!("${variable}: {}", argument.type_name));
        self.values.insert(variable.clone(), argument.value.clone());
        variable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_without_arguments() {
        let request = Query::new("storeConfig")
            .add_field_list(["code", "locale"])
            .build();

        assert_eq!(request.query, "query { storeConfig { code locale } }");
        assert!(request.variables.is_empty());
    }

    #[test]
    fn test_arguments_hoisted_in_order() {
        let request = Query::new("products")
            .add_argument("search", "String", "mug")
            .add_field(
                Field::new("items")
                    .add_field("sku")
                    .add_field(
                        Field::new("thumbnail")
                            .alias("small")
                            .add_argument("size", "Int!", 64)
                            .add_field("url"),
                    ),
            )
            .build();

        assert_eq!(
            request.query,
            "query($search_1: String, $size_2: Int!) { products(search: $search_1) \
             { items { sku small: thumbnail(size: $size_2) { url } } } }"
        );
        assert_eq!(request.variables["search_1"], "mug");
        assert_eq!(request.variables["size_2"], 64);
    }

    #[test]
    fn test_mutation_kind() {
        let request = Query::mutation("removeItemFromCart")
            .add_argument("cart_item_id", "Int!", 5)
            .add_field("total_quantity")
            .build();

        assert!(request.query.starts_with("mutation($cart_item_id_1: Int!)"));
    }

    #[test]
    fn test_request_serializes_as_post_body() {
        let request = Query::new("a").add_argument("id", "ID!", "x").build();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["variables"]["id_1"], "x");
        assert!(json["query"].as_str().unwrap().contains("a(id: $id_1)"));
    }
}
