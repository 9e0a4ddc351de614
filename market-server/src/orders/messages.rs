//! Status message rendering (pure)
//!
//! Renders the human-readable chat texts and notification title/body
//! pairs that accompany every transition. No I/O here; the manager hands
//! the rendered text to the notification bridge.

use shared::order::{Order, OrderStatus};
use shared::util::display_date;

/// Item label for an order, collapsing multi-item orders
///
/// `"<first item>"` for a single line item, `"<first item> +N more"`
/// otherwise.
pub fn item_label(order: &Order) -> String {
    match order.items.as_slice() {
        [] => "your items".to_string(),
        [only] => only.title.clone(),
        [first, rest @ ..] => format!("{} +{} more", first.title, rest.len()),
    }
}

/// Chat message body for a status the order just entered
pub fn status_message(order: &Order) -> String {
    let label = item_label(order);
    let number = &order.order_number;
    match order.status {
        OrderStatus::Confirmed => {
            format!("Order {} confirmed. The seller is preparing {}.", number, label)
        }
        OrderStatus::Processing => {
            format!("Order {} is being processed.", number)
        }
        OrderStatus::ShippingInitiated => format!(
            "Shipping has been initiated for {} (order {}). Cancellation is no longer possible.",
            label, number
        ),
        OrderStatus::Shipped => {
            let mut msg = match &order.tracking_number {
                Some(tracking) => format!(
                    "Order {} has shipped. Tracking number: {}.",
                    number, tracking
                ),
                None => format!("Order {} has shipped.", number),
            };
            if let Some(carrier) = &order.shipping_carrier {
                msg.push_str(&format!(" Carrier: {}.", carrier));
            }
            if let Some(eta) = order.estimated_delivery {
                msg.push_str(&format!(" Estimated delivery: {}.", display_date(eta)));
            }
            msg
        }
        OrderStatus::OutForDelivery => {
            format!("Order {} is out for delivery. {} should arrive today.", number, label)
        }
        OrderStatus::Delivered => {
            format!("Order {} has been delivered. Enjoy {}!", number, label)
        }
        OrderStatus::Cancelled => {
            let reason = order
                .cancellation_reason
                .as_deref()
                .unwrap_or("Cancelled by buyer");
            format!("Order {} was cancelled. Reason: {}.", number, reason)
        }
        OrderStatus::Disputed => {
            format!("A dispute was opened for order {}. Our team will review it shortly.", number)
        }
        // No dedicated template; still announce the change
        status => format!("Order {} status updated to {}.", number, status.label()),
    }
}

/// Push-notification title/body for the counter-party
pub fn status_notification(order: &Order) -> (String, String) {
    let title = match order.status {
        OrderStatus::Confirmed => "Order confirmed",
        OrderStatus::Shipped => "Order shipped",
        OrderStatus::OutForDelivery => "Out for delivery",
        OrderStatus::Delivered => "Order delivered",
        OrderStatus::Cancelled => "Order cancelled",
        OrderStatus::Disputed => "Order disputed",
        OrderStatus::RefundRequested => "Refund requested",
        OrderStatus::Refunded => "Order refunded",
        _ => "Order update",
    };
    (title.to_string(), status_message(order))
}

/// First message of the conversation, sent when the order is placed
pub fn order_placed_message(order: &Order) -> String {
    format!(
        "New order {} placed for {} (total {:.2}).",
        order.order_number,
        item_label(order),
        order.total_amount
    )
}

/// Self-deleting reminder sent to the buyer on delivery
pub fn dispute_deadline_reminder(order: &Order) -> String {
    format!(
        "Order {} was delivered. If something is wrong, you can open a dispute within 24 hours.",
        order.order_number
    )
}

/// Escalation to the seller when the buyer reports non-delivery
pub fn non_delivery_escalation(order: &Order) -> String {
    format!(
        "The buyer reported not receiving order {}. Please verify the delivery with your carrier.",
        order.order_number
    )
}

/// Low-stock alert body for the seller
pub fn low_stock_alert(title: &str, size: Option<&str>, remaining: i32) -> String {
    let unit = match size {
        Some(size) => format!("{} (size {})", title, size),
        None => title.to_string(),
    };
    if remaining == 0 {
        format!("{} is now out of stock.", unit)
    } else {
        format!("{} is running low: {} left.", unit, remaining)
    }
}
