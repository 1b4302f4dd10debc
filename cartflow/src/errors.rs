//! Error types for cartflow.
//!
//! The tracker itself never fails: registration, cancellation and teardown
//! are infallible. Errors only flow through the operations it wraps (the
//! cart backend) and through configuration loading.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for cartflow operations outside the tracker.
#[derive(Debug, Error)]
pub enum CartflowError {
    /// A cart backend operation failed.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Errors reported by a cart mutation backend.
///
/// These reach the caller unchanged through the failure path of a tracked
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartError {
    /// The backend rejected the mutation (e.g. quantity out of range).
    #[error("Cart mutation '{operation}' rejected: {message}")]
    Rejected {
        /// The mutation name.
        operation: String,
        /// Backend message.
        message: String,
    },

    /// The mutation could not be delivered to the backend.
    #[error("Transport error during '{operation}': {message}")]
    Transport {
        /// The mutation name.
        operation: String,
        /// Transport failure description.
        message: String,
    },

    /// The cart line item no longer exists.
    #[error("Cart item not found: {item_id}")]
    ItemNotFound {
        /// The item id.
        item_id: u64,
    },

    /// Updating related items after a removal failed.
    #[error("Related items update failed: {message}")]
    CascadeFailed {
        /// Failure description.
        message: String,
    },

    /// A step of a multi-step mutation was cancelled before it settled.
    #[error("Cart mutation '{operation}' interrupted")]
    Interrupted {
        /// The step that was cancelled.
        operation: String,
    },
}

impl CartError {
    /// Creates a rejected mutation error.
    #[must_use]
    pub fn rejected(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates an item not found error.
    #[must_use]
    pub fn item_not_found(item_id: u64) -> Self {
        Self::ItemNotFound { item_id }
    }

    /// Creates a cascade failure error.
    #[must_use]
    pub fn cascade_failed(message: impl Into<String>) -> Self {
        Self::CascadeFailed {
            message: message.into(),
        }
    }

    /// Creates an interrupted error.
    #[must_use]
    pub fn interrupted(operation: impl Into<String>) -> Self {
        Self::Interrupted {
            operation: operation.into(),
        }
    }

    /// Returns true if retrying the mutation might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Converts to a dictionary representation, suitable for event payloads.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::Rejected { operation, message } => {
                map.insert("type".to_string(), serde_json::json!("CartMutationRejected"));
                map.insert("operation".to_string(), serde_json::json!(operation));
                map.insert("reason".to_string(), serde_json::json!(message));
            }
            Self::Transport { operation, message } => {
                map.insert("type".to_string(), serde_json::json!("CartTransportError"));
                map.insert("operation".to_string(), serde_json::json!(operation));
                map.insert("reason".to_string(), serde_json::json!(message));
            }
            Self::ItemNotFound { item_id } => {
                map.insert("type".to_string(), serde_json::json!("CartItemNotFound"));
                map.insert("item_id".to_string(), serde_json::json!(item_id));
            }
            Self::CascadeFailed { message } => {
                map.insert("type".to_string(), serde_json::json!("CascadeFailed"));
                map.insert("reason".to_string(), serde_json::json!(message));
            }
            Self::Interrupted { operation } => {
                map.insert("type".to_string(), serde_json::json!("CartMutationInterrupted"));
                map.insert("operation".to_string(), serde_json::json!(operation));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}
