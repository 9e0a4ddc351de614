//! Domain error taxonomy
//!
//! Every operation resolves to one of these at its boundary. An operation
//! either commits its full intended change or commits nothing; side-effect
//! failures (chat, notifications) are logged and never surface here.

use crate::orders::store::StorageError;
use shared::order::OrderStatus;
use thiserror::Error;

/// Domain errors
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Window expired: {0}")]
    WindowExpired(String),

    #[error("Out of stock: {0}")]
    OutOfStock(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),
}

pub type MarketResult<T> = Result<T, MarketError>;

/// Classify storage failures into the domain taxonomy
///
/// Version mismatches become `Conflict` so the caller knows to retry
/// against the latest state; missing rows become `NotFound`; everything
/// else stays an internal storage fault.
impl From<StorageError> for MarketError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::VersionConflict { order_id, .. } => MarketError::Conflict(format!(
                "Order {} was modified concurrently, retry against the latest state",
                order_id
            )),
            StorageError::OrderNotFound(id) => MarketError::NotFound(format!("Order not found: {}", id)),
            StorageError::ProductNotFound(id) => {
                MarketError::NotFound(format!("Product not found: {}", id))
            }
            other => MarketError::Storage(other),
        }
    }
}

impl MarketError {
    /// Stable machine-readable kind, for API mapping and logs
    pub fn kind(&self) -> &'static str {
        match self {
            MarketError::Validation(_) => "VALIDATION",
            MarketError::NotFound(_) => "NOT_FOUND",
            MarketError::Unauthorized(_) => "AUTHORIZATION",
            MarketError::InvalidTransition { .. } => "INVALID_TRANSITION",
            MarketError::WindowExpired(_) => "WINDOW_EXPIRED",
            MarketError::OutOfStock(_) => "OUT_OF_STOCK",
            MarketError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            MarketError::Conflict(_) => "CONFLICT",
            MarketError::Storage(_) => "INTERNAL",
        }
    }
}
