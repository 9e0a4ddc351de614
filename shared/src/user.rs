//! User profile snapshot (the slice the order engine reads)

use serde::{Deserialize, Serialize};

/// Default stock level that triggers a low-stock alert to the seller
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 3;

/// User directory entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    /// Whether this seller accepts pay-on-delivery orders
    #[serde(default)]
    pub accepts_pay_on_delivery: bool,
    /// Seller-configured low-stock alert threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i32>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            accepts_pay_on_delivery: false,
            low_stock_threshold: None,
        }
    }

    pub fn effective_low_stock_threshold(&self) -> i32 {
        self.low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}
