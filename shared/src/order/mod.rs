//! Order domain types
//!
//! This module provides the order record and its lifecycle vocabulary:
//! - Status: the lifecycle state enum and terminality rules
//! - Types: line-item snapshots, payment fields, the audit-trail entry
//! - Record: the `Order` itself, mutated only by appending to its history
//!   and updating derived fields

pub mod record;
pub mod status;
pub mod types;

// Re-exports
pub use record::Order;
pub use status::OrderStatus;
pub use types::{
    OrderItem, Party, PaymentMethod, PaymentStatus, ShippingAddress, StatusHistoryEntry,
    TrackingUpdate,
};
