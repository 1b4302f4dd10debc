//! Operation identity and lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identity of a tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(crate::utils::generate_uuid())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The lifecycle state of a tracked operation.
///
/// Transitions are one-way: `Pending` moves to exactly one of the terminal
/// states and never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    /// The operation has not settled yet.
    #[default]
    Pending,
    /// The operation succeeded and its continuation ran.
    Resolved,
    /// The operation failed and its continuation ran.
    Rejected,
    /// The handle was cancelled; any later settlement is suppressed.
    Cancelled,
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Resolved => write!(f, "resolved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl OperationState {
    /// Returns true if the state is final.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the operation settled (resolved or rejected).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }

    /// Returns true if `next` is a legal transition from this state.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        *self == Self::Pending && next.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(OperationState::Pending.to_string(), "pending");
        assert_eq!(OperationState::Resolved.to_string(), "resolved");
        assert_eq!(OperationState::Rejected.to_string(), "rejected");
        assert_eq!(OperationState::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_state_is_terminal() {
        assert!(!OperationState::Pending.is_terminal());
        assert!(OperationState::Resolved.is_terminal());
        assert!(OperationState::Rejected.is_terminal());
        assert!(OperationState::Cancelled.is_terminal());
        assert!(!OperationState::Cancelled.is_settled());
    }

    #[test]
    fn test_transitions_are_one_way() {
        assert!(OperationState::Pending.can_transition_to(OperationState::Cancelled));
        assert!(OperationState::Pending.can_transition_to(OperationState::Resolved));
        assert!(!OperationState::Pending.can_transition_to(OperationState::Pending));
        assert!(!OperationState::Resolved.can_transition_to(OperationState::Cancelled));
        assert!(!OperationState::Cancelled.can_transition_to(OperationState::Rejected));
    }

    #[test]
    fn test_state_serialize() {
        let json = serde_json::to_string(&OperationState::Cancelled).unwrap();
        assert_eq!(json, r#""cancelled""#);

        let parsed: OperationState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, OperationState::Cancelled);
    }

    #[test]
    fn test_operation_ids_are_unique() {
        assert_ne!(OperationId::new(), OperationId::new());
    }
}
