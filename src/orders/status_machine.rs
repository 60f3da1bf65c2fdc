use crate::orders::OrderStatus;

/// Service for managing order status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Confirmed → Preparing → ReadyForPickup → PickedUp → Delivered
    /// - Any non-terminal status → Cancelled
    /// - Delivered or Cancelled → Refunded
    /// - Any status → Same status (idempotent)
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        if from == to {
            return true;
        }

        match (from, to) {
            (OrderStatus::Pending, OrderStatus::Confirmed) => true,
            (OrderStatus::Confirmed, OrderStatus::Preparing) => true,
            (OrderStatus::Preparing, OrderStatus::ReadyForPickup) => true,
            (OrderStatus::ReadyForPickup, OrderStatus::PickedUp) => true,
            (OrderStatus::PickedUp, OrderStatus::Delivered) => true,

            (from, OrderStatus::Cancelled) => !from.is_terminal(),

            (OrderStatus::Delivered, OrderStatus::Refunded) => true,
            (OrderStatus::Cancelled, OrderStatus::Refunded) => true,

            _ => false,
        }
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let path = [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::ReadyForPickup,
            OrderStatus::PickedUp,
            OrderStatus::Delivered,
        ];
        for pair in path.windows(2) {
            assert!(
                StatusMachine::is_valid_transition(pair[0], pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_cannot_skip_steps() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Preparing
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Confirmed,
            OrderStatus::Delivered
        ));
    }

    #[test]
    fn test_cannot_move_backwards() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Preparing,
            OrderStatus::Confirmed
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Delivered,
            OrderStatus::PickedUp
        ));
    }

    #[test]
    fn test_cancel_from_non_terminal() {
        for status in OrderStatus::ALL.iter().filter(|s| !s.is_terminal()) {
            assert!(StatusMachine::is_valid_transition(*status, OrderStatus::Cancelled));
        }
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Delivered,
            OrderStatus::Cancelled
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Refunded,
            OrderStatus::Cancelled
        ));
    }

    #[test]
    fn test_refunds() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Delivered,
            OrderStatus::Refunded
        ));
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Cancelled,
            OrderStatus::Refunded
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Preparing,
            OrderStatus::Refunded
        ));
    }

    #[test]
    fn test_refunded_is_final() {
        for status in OrderStatus::ALL {
            if status != OrderStatus::Refunded {
                assert!(!StatusMachine::is_valid_transition(OrderStatus::Refunded, status));
            }
        }
    }

    #[test]
    fn test_same_status_is_idempotent() {
        for status in OrderStatus::ALL {
            assert_eq!(StatusMachine::transition(status, status), Ok(status));
        }
    }

    #[test]
    fn test_transition_error_message() {
        let err = StatusMachine::transition(OrderStatus::Pending, OrderStatus::Delivered).unwrap_err();
        assert_eq!(err, "Invalid status transition from pending to delivered");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn any_status() -> impl Strategy<Value = OrderStatus> {
        proptest::sample::select(OrderStatus::ALL.to_vec())
    }

    proptest! {
        /// Terminal orders only ever move to refunded (or stay put)
        #[test]
        fn prop_terminal_orders_only_refund(from in any_status(), to in any_status()) {
            if from.is_terminal() && from != to && StatusMachine::is_valid_transition(from, to) {
                prop_assert_eq!(to, OrderStatus::Refunded);
            }
        }

        /// transition agrees with is_valid_transition
        #[test]
        fn prop_transition_consistent(from in any_status(), to in any_status()) {
            prop_assert_eq!(
                StatusMachine::transition(from, to).is_ok(),
                StatusMachine::is_valid_transition(from, to)
            );
        }
    }
}
