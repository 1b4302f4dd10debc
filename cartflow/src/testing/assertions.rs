//! Test assertions for handles and settlements.

use crate::tracker::{OperationHandle, OperationState, Settlement};
use std::fmt::Debug;

/// Asserts that the handle is in the expected state.
pub fn assert_handle_state(handle: &OperationHandle, expected: OperationState) {
    assert_eq!(
        handle.state(),
        expected,
        "Expected operation '{}' to be {}, got {}",
        handle.label(),
        expected,
        handle.state()
    );
}

/// Asserts that the settlement is a success and returns its value.
pub fn assert_resolved<T: Debug, E: Debug>(settlement: Settlement<T, E>) -> T {
    match settlement {
        Settlement::Resolved(value) => value,
        other => panic!("Expected resolved settlement, got {other:?}"),
    }
}

/// Asserts that the settlement is a failure and returns its error.
pub fn assert_rejected<T: Debug, E: Debug>(settlement: Settlement<T, E>) -> E {
    match settlement {
        Settlement::Rejected(error) => error,
        other => panic!("Expected rejected settlement, got {other:?}"),
    }
}

/// Asserts that delivery of the settlement was suppressed.
pub fn assert_cancelled<T: Debug, E: Debug>(settlement: &Settlement<T, E>) {
    assert!(
        settlement.is_cancelled(),
        "Expected cancelled settlement, got {settlement:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_resolved() {
        let value = assert_resolved(Settlement::<u32, String>::Resolved(4));
        assert_eq!(value, 4);
    }

    #[test]
    #[should_panic(expected = "Expected resolved")]
    fn test_assert_resolved_fails() {
        assert_resolved(Settlement::<u32, String>::Cancelled);
    }

    #[test]
    fn test_assert_rejected() {
        let error = assert_rejected(Settlement::<u32, String>::Rejected("x".to_string()));
        assert_eq!(error, "x");
    }

    #[test]
    fn test_assert_cancelled() {
        assert_cancelled(&Settlement::<u32, String>::Cancelled);
    }

    #[test]
    #[should_panic(expected = "Expected cancelled")]
    fn test_assert_cancelled_fails() {
        assert_cancelled(&Settlement::<u32, String>::Resolved(1));
    }

    #[tokio::test]
    async fn test_assert_handle_state() {
        let registry = crate::tracker::OperationRegistry::default();
        let (_resolver, operation) = crate::testing::deferred::<u32, String>();
        let handle = registry.register("op", operation, crate::tracker::Continuation::ignore());

        assert_handle_state(&handle, OperationState::Pending);
        handle.cancel();
        assert_handle_state(&handle, OperationState::Cancelled);
    }
}
