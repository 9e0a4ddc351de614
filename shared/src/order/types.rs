//! Shared types for the order record

use super::status::OrderStatus;
use serde::{Deserialize, Serialize};

// ============================================================================
// Payment Types
// ============================================================================

/// 支付方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    PayOnDelivery,
    /// Prepaid through the online gateway
    Online,
}

/// 支付状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
}

// ============================================================================
// Parties
// ============================================================================

/// Who performed an order mutation (recorded in the audit trail)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Party {
    Buyer,
    Seller,
    System,
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Party::Buyer => write!(f, "BUYER"),
            Party::Seller => write!(f, "SELLER"),
            Party::System => write!(f, "SYSTEM"),
        }
    }
}

// ============================================================================
// Line Items
// ============================================================================

/// Line item snapshot - frozen at order creation
///
/// Price and title do not follow later catalog edits. The title already
/// includes the selected size where one applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Product (post) ID
    pub post_id: String,
    /// Title snapshot, including selected size if applicable
    pub title: String,
    /// Unit price snapshot
    pub unit_price: f64,
    /// Quantity purchased
    pub quantity: i32,
    /// Primary image URL snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Selected size variant, if the product has size variants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
}

// ============================================================================
// Audit Trail
// ============================================================================

/// Append-only audit record of a status change
///
/// Entries are never truncated or rewritten once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    /// Unix milliseconds
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub updated_by: Party,
}

// ============================================================================
// Shipping
// ============================================================================

/// Shipping destination snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShippingAddress {
    pub recipient: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Seller-supplied tracking details for a status update
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    /// Estimated delivery time (Unix milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<i64>,
}

impl TrackingUpdate {
    pub fn is_empty(&self) -> bool {
        self.tracking_number.is_none()
            && self.tracking_link.is_none()
            && self.carrier.is_none()
            && self.estimated_delivery.is_none()
    }
}
