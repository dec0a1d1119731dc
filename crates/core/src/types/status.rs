//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// An order status change that is not allowed.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}", self.describe())]
pub struct InvalidTransition {
    /// Current status.
    pub from: OrderStatus,
    /// Requested status.
    pub to: OrderStatus,
}

impl InvalidTransition {
    fn describe(&self) -> String {
        if self.from.is_terminal() {
            format!("order is already {} and cannot change", self.from)
        } else {
            format!("cannot move order from {} to {}", self.from, self.to)
        }
    }
}

/// Order fulfillment status.
///
/// Orders start as `Pending` and only move forward:
///
/// ```text
/// pending ──► processing ──► shipped ──► delivered
///    │             │
///    └─────────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order can no longer change status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is an allowed transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }

    /// Validate a transition, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if the move is not allowed.
    pub const fn transition_to(self, next: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment status reported by the payment provider via the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_allowed_transitions() {
        let allowed: Vec<(OrderStatus, OrderStatus)> = ALL
            .iter()
            .flat_map(|from| ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .collect();

        assert_eq!(
            allowed,
            vec![
                (OrderStatus::Pending, OrderStatus::Processing),
                (OrderStatus::Pending, OrderStatus::Cancelled),
                (OrderStatus::Processing, OrderStatus::Shipped),
                (OrderStatus::Processing, OrderStatus::Cancelled),
                (OrderStatus::Shipped, OrderStatus::Delivered),
            ]
        );
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for next in ALL {
                assert!(terminal.transition_to(next).is_err());
            }
        }
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = OrderStatus::Shipped
            .transition_to(OrderStatus::Pending)
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot move order from shipped to pending");

        let err = OrderStatus::Delivered
            .transition_to(OrderStatus::Cancelled)
            .unwrap_err();
        assert_eq!(err.to_string(), "order is already delivered and cannot change");
    }

    #[test]
    fn test_status_parse_matches_display() {
        for status in ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert!("returned".parse::<OrderStatus>().is_err());
    }
}
