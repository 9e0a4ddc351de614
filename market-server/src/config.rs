//! Engine configuration
//!
//! Pricing policy knobs. The three time windows are fixed domain policy
//! and live as constants in `orders::policy`, not here.

/// Marketplace configuration
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Order number prefix (`<prefix>-YYYYMMDD-NNNNN`)
    pub order_prefix: String,
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: f64,
    /// Flat shipping fee below the threshold
    pub flat_shipping_fee: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            order_prefix: "ORD".to_string(),
            free_shipping_threshold: 500.0,
            flat_shipping_fee: 50.0,
        }
    }
}

impl MarketConfig {
    /// Shipping charge for a given subtotal
    pub fn shipping_charge(&self, subtotal: f64) -> f64 {
        if subtotal >= self.free_shipping_threshold {
            0.0
        } else {
            self.flat_shipping_fee
        }
    }
}
