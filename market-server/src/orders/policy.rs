//! Time-window policy
//!
//! Pure predicates over "now" versus a stored timestamp. The windows are
//! fixed domain policy, evaluated once per call and never cached or
//! pre-scheduled.

/// Buyer may cancel within 24 hours of order creation
pub const CANCELLATION_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Buyer may dispute within 24 hours of delivery
pub const DISPUTE_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Orders idle in OUT_FOR_DELIVERY for 48 hours auto-confirm
pub const AUTO_CONFIRM_AFTER_MS: i64 = 48 * 60 * 60 * 1000;

/// Dispute-deadline reminder messages self-delete after 24 hours
pub const REMINDER_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Whether a cancellation requested at `now` is still within the window
pub fn within_cancellation_window(created_at: i64, now: i64) -> bool {
    now - created_at <= CANCELLATION_WINDOW_MS
}

/// Whether a dispute requested at `now` is still within the window
pub fn within_dispute_window(delivered_at: i64, now: i64) -> bool {
    now - delivered_at <= DISPUTE_WINDOW_MS
}

/// Whether an order idle since `last_updated_at` has aged past the
/// auto-confirmation threshold (inverted window: true means elapsed)
pub fn eligible_for_auto_confirm(last_updated_at: i64, now: i64) -> bool {
    now - last_updated_at > AUTO_CONFIRM_AFTER_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 60 * 60 * 1000;

    #[test]
    fn test_cancellation_window() {
        assert!(within_cancellation_window(0, HOUR));
        assert!(within_cancellation_window(0, 24 * HOUR));
        assert!(!within_cancellation_window(0, 24 * HOUR + 1));
        assert!(!within_cancellation_window(0, 25 * HOUR));
    }

    #[test]
    fn test_dispute_window() {
        assert!(within_dispute_window(0, 23 * HOUR));
        assert!(within_dispute_window(0, 24 * HOUR));
        assert!(!within_dispute_window(0, 24 * HOUR + 1));
    }

    #[test]
    fn test_auto_confirm_threshold() {
        assert!(!eligible_for_auto_confirm(0, 48 * HOUR));
        assert!(eligible_for_auto_confirm(0, 48 * HOUR + 1));
        assert!(eligible_for_auto_confirm(0, 72 * HOUR));
    }
}
