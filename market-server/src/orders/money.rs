//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done in `Decimal` and converted back to `f64` for
//! storage and serialization, rounded half-up to 2 decimal places.

use crate::error::{MarketError, MarketResult};
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
const MAX_QUANTITY: i32 = 9_999;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Validate price and quantity before any stock or order mutation
pub fn validate_purchase(unit_price: f64, quantity: i32) -> MarketResult<()> {
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(MarketError::Validation(format!(
            "Unit price must be a non-negative finite number, got {}",
            unit_price
        )));
    }
    if unit_price > MAX_PRICE {
        return Err(MarketError::Validation(format!(
            "Unit price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, unit_price
        )));
    }
    if quantity <= 0 || quantity > MAX_QUANTITY {
        return Err(MarketError::Validation(format!(
            "Quantity must be between 1 and {}, got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// `unit_price * quantity`, rounded
pub fn line_subtotal(unit_price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// `subtotal + shipping - discount`, rounded
pub fn order_total(subtotal: f64, shipping: f64, discount: f64) -> f64 {
    to_f64(to_decimal(subtotal) + to_decimal(shipping) - to_decimal(discount))
}
