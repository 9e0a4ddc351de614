//! User directory (external collaborator, in-memory implementation)
//!
//! The engine only reads profile slices: display names for message
//! templating, pay-on-delivery eligibility, and the seller's low-stock
//! alert threshold.

use dashmap::DashMap;
use shared::user::UserProfile;
use std::sync::Arc;

/// In-memory user directory
#[derive(Clone, Default)]
pub struct UserDirectory {
    profiles: Arc<DashMap<String, UserProfile>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, profile: UserProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    pub fn get(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.get(user_id).map(|p| p.clone())
    }

    /// Display name, falling back to the raw id for unknown users
    pub fn display_name(&self, user_id: &str) -> String {
        self.get(user_id)
            .map(|p| p.display_name)
            .unwrap_or_else(|| user_id.to_string())
    }

    /// Seller's effective low-stock threshold (default when unset)
    pub fn low_stock_threshold(&self, seller_id: &str) -> i32 {
        self.get(seller_id)
            .map(|p| p.effective_low_stock_threshold())
            .unwrap_or(shared::user::DEFAULT_LOW_STOCK_THRESHOLD)
    }

    /// Whether the seller accepts pay-on-delivery orders
    pub fn accepts_pay_on_delivery(&self, seller_id: &str) -> bool {
        self.get(seller_id)
            .map(|p| p.accepts_pay_on_delivery)
            .unwrap_or(false)
    }
}
