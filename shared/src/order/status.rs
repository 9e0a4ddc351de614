//! Order lifecycle states

use serde::{Deserialize, Serialize};

/// Order status
///
/// `Cancelled` and `Refunded` are terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    ShippingInitiated,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
    Disputed,
    RefundRequested,
    Refunded,
}

impl OrderStatus {
    /// Whether this state has no outgoing transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }

    /// Human-readable label for chat messages and notifications
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::ShippingInitiated => "shipping initiated",
            OrderStatus::Shipped => "shipped",
            OrderStatus::OutForDelivery => "out for delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Disputed => "disputed",
            OrderStatus::RefundRequested => "refund requested",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Confirmed => write!(f, "CONFIRMED"),
            OrderStatus::Processing => write!(f, "PROCESSING"),
            OrderStatus::ShippingInitiated => write!(f, "SHIPPING_INITIATED"),
            OrderStatus::Shipped => write!(f, "SHIPPED"),
            OrderStatus::OutForDelivery => write!(f, "OUT_FOR_DELIVERY"),
            OrderStatus::Delivered => write!(f, "DELIVERED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::Disputed => write!(f, "DISPUTED"),
            OrderStatus::RefundRequested => write!(f, "REFUND_REQUESTED"),
            OrderStatus::Refunded => write!(f, "REFUNDED"),
        }
    }
}
