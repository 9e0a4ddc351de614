//! Order record - the persistent transaction between buyer and seller
//!
//! An order is created once and afterwards mutated only by appending to
//! `status_history` and updating derived fields. It is never deleted.
//! The `version` field is a monotonic optimistic-concurrency token: every
//! store write compares it and rejects stale writers.

use super::status::OrderStatus;
use super::types::{
    OrderItem, Party, PaymentMethod, PaymentStatus, ShippingAddress, StatusHistoryEntry,
};
use serde::{Deserialize, Serialize};

/// One purchase transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Internal ID (assigned by the store)
    pub id: String,
    /// Human-readable unique order number (`PREFIX-YYYYMMDD-NNNNN`)
    pub order_number: String,

    // === Parties ===
    pub buyer_id: String,
    pub seller_id: String,

    // === Items ===
    /// Immutable line-item snapshots
    pub items: Vec<OrderItem>,

    // === Pricing ===
    /// Invariant: `total_amount = subtotal + shipping_charge - discount`
    pub subtotal: f64,
    pub shipping_charge: f64,
    #[serde(default)]
    pub discount: f64,
    pub total_amount: f64,

    // === Payment ===
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,

    // === Lifecycle ===
    pub status: OrderStatus,
    /// Append-only audit log, never truncated or rewritten
    pub status_history: Vec<StatusHistoryEntry>,

    // === Shipping ===
    pub shipping_address: ShippingAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_carrier: Option<String>,
    /// Estimated delivery time (Unix milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,

    // === Cancellation / Dispute / Refund ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<Party>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispute_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disputed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,

    // === Conversation ===
    /// One-directional link to the buyer-seller conversation
    /// (the conversation holds no back-pointer)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,

    // === Timestamps ===
    pub created_at: i64,
    pub updated_at: i64,

    /// Optimistic concurrency token, bumped on every committed write
    #[serde(default)]
    pub version: u64,
}

impl Order {
    /// Create a new pending order
    ///
    /// Stamps the initial `PENDING` history entry. `total_amount` is
    /// passed in pre-computed so the caller's rounded arithmetic is
    /// stored verbatim; it must satisfy
    /// `total_amount = subtotal + shipping_charge - discount`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        order_number: String,
        buyer_id: String,
        seller_id: String,
        items: Vec<OrderItem>,
        subtotal: f64,
        shipping_charge: f64,
        discount: f64,
        total_amount: f64,
        payment_method: PaymentMethod,
        shipping_address: ShippingAddress,
        now: i64,
    ) -> Self {
        Self {
            id,
            order_number,
            buyer_id,
            seller_id,
            items,
            subtotal,
            shipping_charge,
            discount,
            total_amount,
            payment_method,
            payment_status: PaymentStatus::Pending,
            transaction_id: None,
            paid_at: None,
            status: OrderStatus::Pending,
            status_history: vec![StatusHistoryEntry {
                status: OrderStatus::Pending,
                timestamp: now,
                note: Some("Order placed".to_string()),
                updated_by: Party::Buyer,
            }],
            shipping_address,
            tracking_number: None,
            tracking_link: None,
            shipping_carrier: None,
            estimated_delivery: None,
            delivered_at: None,
            cancellation_reason: None,
            cancelled_by: None,
            dispute_reason: None,
            disputed_at: None,
            refund_reason: None,
            refund_amount: None,
            chat_id: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Append an audit entry and move to `status`
    ///
    /// The only sanctioned way to change `status`; keeps the history
    /// append-only and `updated_at` in sync.
    pub fn record_status(&mut self, status: OrderStatus, note: Option<String>, by: Party, now: i64) {
        self.status = status;
        self.status_history.push(StatusHistoryEntry {
            status,
            timestamp: now,
            note,
            updated_by: by,
        });
        self.updated_at = now;
    }

    /// Append an audit entry without changing the current status
    ///
    /// Used for non-transition facts such as a buyer reporting
    /// non-delivery.
    pub fn record_note(&mut self, note: String, by: Party, now: i64) {
        self.status_history.push(StatusHistoryEntry {
            status: self.status,
            timestamp: now,
            note: Some(note),
            updated_by: by,
        });
        self.updated_at = now;
    }

    /// The counter-party of `user_id`, if the user is a participant
    pub fn counterparty(&self, user_id: &str) -> Option<&str> {
        if user_id == self.buyer_id {
            Some(&self.seller_id)
        } else if user_id == self.seller_id {
            Some(&self.buyer_id)
        } else {
            None
        }
    }

    pub fn is_buyer(&self, user_id: &str) -> bool {
        self.buyer_id == user_id
    }

    pub fn is_seller(&self, user_id: &str) -> bool {
        self.seller_id == user_id
    }
}
