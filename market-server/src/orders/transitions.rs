//! Status transition matrix
//!
//! The matrix is fixed domain policy. Operation-specific preconditions
//! (windows, roles, tracking numbers) are checked by the manager before
//! this generic check; a target outside the allowed set always rejects
//! with `InvalidTransition` and leaves the order untouched.

use crate::error::{MarketError, MarketResult};
use shared::order::OrderStatus;

/// Allowed next states for a given current state
pub fn allowed_targets(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        Pending => &[Confirmed, Cancelled],
        Confirmed => &[ShippingInitiated, Cancelled],
        Processing => &[ShippingInitiated, Cancelled],
        ShippingInitiated => &[Shipped],
        Shipped => &[OutForDelivery, Delivered],
        OutForDelivery => &[Delivered],
        Delivered => &[Disputed, RefundRequested],
        Disputed => &[Refunded],
        RefundRequested => &[Refunded],
        // Terminal
        Cancelled => &[],
        Refunded => &[],
    }
}

/// Whether `from -> to` is in the matrix
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_targets(from).contains(&to)
}

/// Matrix check, as a `MarketResult`
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> MarketResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(MarketError::InvalidTransition { from, to })
    }
}
