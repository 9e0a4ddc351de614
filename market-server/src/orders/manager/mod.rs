//! OrdersManager - order operations and their side effects
//!
//! # Operation Flow
//!
//! ```text
//! operation(args)
//!     |- 1. Load order, check the actor's role
//!     |- 2. Operation-specific preconditions (windows, tracking, ...)
//!     |- 3. Generic transition-matrix check
//!     |- 4. Mutate the record, append the audit entry
//!     |- 5. Commit via compare-and-swap on the version
//!     `- 6. Dispatch chat + notification side effects (best-effort)
//! ```
//!
//! An operation commits its full intended change or nothing. Side
//! effects run after the commit and are logged on failure, never
//! surfaced as the operation's failure.

use crate::config::MarketConfig;
use crate::directory::UserDirectory;
use crate::error::{MarketError, MarketResult};
use crate::inventory::InventoryService;
use crate::notify::NotificationBridge;
use crate::orders::messages;
use crate::orders::money;
use crate::orders::number::OrderNumberGenerator;
use crate::orders::policy;
use crate::orders::store::OrderStore;
use crate::orders::transitions;
use shared::chat::MessagePayload;
use shared::order::{
    Order, OrderItem, OrderStatus, Party, PaymentMethod, PaymentStatus, ShippingAddress,
    TrackingUpdate,
};
use shared::util::now_millis;
use std::sync::Arc;

/// Default note recorded when the buyer gives no cancellation reason
const DEFAULT_CANCEL_REASON: &str = "Cancelled by buyer";

/// Order creation request
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub buyer_id: String,
    pub post_id: String,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub selected_size: Option<String>,
}

/// Orchestrates the order lifecycle
#[derive(Clone)]
pub struct OrdersManager {
    store: OrderStore,
    inventory: InventoryService,
    directory: UserDirectory,
    bridge: Arc<dyn NotificationBridge>,
    numbers: OrderNumberGenerator,
    config: MarketConfig,
}

impl OrdersManager {
    pub fn new(
        store: OrderStore,
        inventory: InventoryService,
        directory: UserDirectory,
        bridge: Arc<dyn NotificationBridge>,
        config: MarketConfig,
    ) -> Self {
        let numbers = OrderNumberGenerator::new(store.clone(), config.order_prefix.clone());
        Self {
            store,
            inventory,
            directory,
            bridge,
            numbers,
            config,
        }
    }

    // ========== Queries ==========

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> MarketResult<Order> {
        self.store
            .get_order(order_id)?
            .ok_or_else(|| MarketError::NotFound(format!("Order not found: {}", order_id)))
    }

    // ========== Order Creation ==========

    /// Create a new pending order
    ///
    /// Reserves stock, allocates the order number, snapshots the line
    /// item and opens (or reuses) the buyer-seller conversation.
    pub async fn create_order(&self, req: CreateOrderRequest) -> MarketResult<Order> {
        validate_address(&req.shipping_address)?;

        // Pre-checks before touching stock or the counter, so failed
        // creations waste neither
        let product = self
            .inventory
            .catalog()
            .get_product(&req.post_id)?
            .ok_or_else(|| MarketError::NotFound(format!("Product not found: {}", req.post_id)))?;
        if product.seller_id == req.buyer_id {
            return Err(MarketError::Validation(
                "You cannot purchase your own listing".to_string(),
            ));
        }
        if req.payment_method == PaymentMethod::PayOnDelivery
            && !self.directory.accepts_pay_on_delivery(&product.seller_id)
        {
            return Err(MarketError::Validation(
                "Seller does not accept pay-on-delivery".to_string(),
            ));
        }

        let now = now_millis();
        // Counter failure aborts creation: no order exists without a number
        let order_number = self.numbers.next(now)?;

        let reservation = self
            .inventory
            .reserve(&req.post_id, req.selected_size.as_deref(), req.quantity)
            .await?;

        let title = match &req.selected_size {
            Some(size) => format!("{} ({})", reservation.product.title, size),
            None => reservation.product.title.clone(),
        };
        let item = OrderItem {
            post_id: req.post_id.clone(),
            title,
            unit_price: reservation.unit_price,
            quantity: req.quantity,
            image: reservation.product.image.clone(),
            selected_size: req.selected_size.clone(),
        };

        let subtotal = money::line_subtotal(item.unit_price, item.quantity);
        let shipping_charge = self.config.shipping_charge(subtotal);
        let total_amount = money::order_total(subtotal, shipping_charge, 0.0);

        let mut order = Order::new(
            uuid::Uuid::new_v4().to_string(),
            order_number,
            req.buyer_id.clone(),
            reservation.product.seller_id.clone(),
            vec![item],
            subtotal,
            shipping_charge,
            0.0,
            total_amount,
            req.payment_method,
            req.shipping_address,
            now,
        );

        // The conversation link is best-effort: an order may exist
        // without a chat, never the other way around
        match self
            .bridge
            .ensure_conversation(&order.buyer_id, &order.seller_id)
            .await
        {
            Ok(chat_id) => order.chat_id = Some(chat_id),
            Err(e) => {
                tracing::warn!(order_number = %order.order_number, error = %e, "Conversation setup failed")
            }
        }

        self.store.insert_order(&order)?;
        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            buyer_id = %order.buyer_id,
            seller_id = %order.seller_id,
            total = order.total_amount,
            "Order created"
        );

        self.dispatch_order_placed(&order).await;
        Ok(order)
    }

    // ========== Buyer Operations ==========

    /// Cancel an order (buyer-only, within 24h of creation)
    pub async fn cancel_order(
        &self,
        order_id: &str,
        buyer_id: &str,
        reason: Option<String>,
    ) -> MarketResult<Order> {
        let mut order = self.get_order(order_id)?;
        require_buyer(&order, buyer_id)?;

        let now = now_millis();
        // Distinct failure reasons: expired window vs. wrong state
        if matches!(
            order.status,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
        ) && !policy::within_cancellation_window(order.created_at, now)
        {
            return Err(MarketError::WindowExpired(
                "Orders can only be cancelled within 24 hours of placement".to_string(),
            ));
        }
        transitions::check_transition(order.status, OrderStatus::Cancelled)?;

        let reason = reason.unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string());
        order.cancellation_reason = Some(reason.clone());
        order.cancelled_by = Some(Party::Buyer);
        // Prepaid and captured: flag the amount for refunding
        if order.payment_method == PaymentMethod::Online
            && order.payment_status == PaymentStatus::Completed
        {
            order.refund_amount = Some(order.total_amount);
            order.refund_reason = Some("Refund due for cancelled prepaid order".to_string());
        }
        order.record_status(OrderStatus::Cancelled, Some(reason), Party::Buyer, now);

        let order = self.store.update_order(&order, order.version)?;
        tracing::info!(order_id = %order.id, "Order cancelled by buyer");

        self.dispatch_transition_effects(&order, Party::Buyer).await;
        Ok(order)
    }

    /// Request a refund (buyer-only, only while exactly delivered)
    pub async fn request_refund(
        &self,
        order_id: &str,
        buyer_id: &str,
        reason: String,
    ) -> MarketResult<Order> {
        let mut order = self.get_order(order_id)?;
        require_buyer(&order, buyer_id)?;
        if reason.trim().is_empty() {
            return Err(MarketError::Validation(
                "A refund reason is required".to_string(),
            ));
        }
        transitions::check_transition(order.status, OrderStatus::RefundRequested)?;

        let now = now_millis();
        order.refund_reason = Some(reason.clone());
        order.record_status(
            OrderStatus::RefundRequested,
            Some(reason),
            Party::Buyer,
            now,
        );

        let order = self.store.update_order(&order, order.version)?;
        tracing::info!(order_id = %order.id, "Refund requested");

        self.dispatch_transition_effects(&order, Party::Buyer).await;
        Ok(order)
    }

    /// Dispute an order (buyer-only, within 24h of delivery)
    pub async fn dispute_order(
        &self,
        order_id: &str,
        buyer_id: &str,
        reason: Option<String>,
    ) -> MarketResult<Order> {
        let mut order = self.get_order(order_id)?;
        require_buyer(&order, buyer_id)?;

        let now = now_millis();
        if let Some(delivered_at) = order.delivered_at {
            if !policy::within_dispute_window(delivered_at, now) {
                return Err(MarketError::WindowExpired(
                    "Disputes can only be opened within 24 hours of delivery".to_string(),
                ));
            }
        }
        transitions::check_transition(order.status, OrderStatus::Disputed)?;

        order.dispute_reason = reason.clone();
        order.disputed_at = Some(now);
        order.record_status(OrderStatus::Disputed, reason, Party::Buyer, now);

        let order = self.store.update_order(&order, order.version)?;
        tracing::info!(order_id = %order.id, "Dispute opened");

        self.dispatch_transition_effects(&order, Party::Buyer).await;
        Ok(order)
    }

    /// Confirm (or deny) delivery from the buyer's side
    ///
    /// `confirmed = true` forces the order to delivered, idempotently if
    /// it already is. `confirmed = false` changes nothing except an
    /// audit entry and an escalation to the seller; it does not open a
    /// dispute.
    pub async fn confirm_delivery(
        &self,
        order_id: &str,
        buyer_id: &str,
        confirmed: bool,
    ) -> MarketResult<Order> {
        let mut order = self.get_order(order_id)?;
        require_buyer(&order, buyer_id)?;
        if !matches!(
            order.status,
            OrderStatus::Delivered | OrderStatus::OutForDelivery
        ) {
            return Err(MarketError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Delivered,
            });
        }

        let now = now_millis();
        if !confirmed {
            order.record_note(
                "Buyer reported not receiving the order".to_string(),
                Party::Buyer,
                now,
            );
            let order = self.store.update_order(&order, order.version)?;
            tracing::info!(order_id = %order.id, "Buyer reported non-delivery");
            self.dispatch_non_delivery_escalation(&order).await;
            return Ok(order);
        }

        if order.status == OrderStatus::Delivered {
            // Already delivered: confirm is an audit fact, not a transition
            apply_delivery(&mut order, now);
            order.record_note("Delivery confirmed by buyer".to_string(), Party::Buyer, now);
            let order = self.store.update_order(&order, order.version)?;
            return Ok(order);
        }

        apply_delivery(&mut order, now);
        order.record_status(
            OrderStatus::Delivered,
            Some("Delivery confirmed by buyer".to_string()),
            Party::Buyer,
            now,
        );
        let order = self.store.update_order(&order, order.version)?;
        tracing::info!(order_id = %order.id, "Delivery confirmed by buyer");

        self.dispatch_transition_effects(&order, Party::Buyer).await;
        Ok(order)
    }

    // ========== Seller Operations ==========

    /// Seller-driven status progression
    ///
    /// Buyer-only pseudo-transitions (`cancelled`, `disputed`,
    /// `refund_requested`) are rejected before the matrix check.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        seller_id: &str,
        new_status: OrderStatus,
        tracking: TrackingUpdate,
        note: Option<String>,
    ) -> MarketResult<Order> {
        let mut order = self.get_order(order_id)?;
        require_seller(&order, seller_id)?;

        match new_status {
            OrderStatus::Cancelled | OrderStatus::Disputed | OrderStatus::RefundRequested => {
                return Err(MarketError::Validation(format!(
                    "Status {} is set through its dedicated operation",
                    new_status
                )));
            }
            OrderStatus::Shipped if tracking.tracking_number.is_none() => {
                return Err(MarketError::Validation(
                    "A tracking number is required to mark an order as shipped".to_string(),
                ));
            }
            _ => {}
        }
        transitions::check_transition(order.status, new_status)?;

        let now = now_millis();
        if !tracking.is_empty() {
            if let Some(tracking_number) = tracking.tracking_number {
                order.tracking_number = Some(tracking_number);
            }
            if let Some(tracking_link) = tracking.tracking_link {
                order.tracking_link = Some(tracking_link);
            }
            if let Some(carrier) = tracking.carrier {
                order.shipping_carrier = Some(carrier);
            }
            if let Some(estimated_delivery) = tracking.estimated_delivery {
                order.estimated_delivery = Some(estimated_delivery);
            }
        }
        if new_status == OrderStatus::Delivered {
            apply_delivery(&mut order, now);
        }
        if new_status == OrderStatus::Refunded && order.refund_amount.is_none() {
            order.refund_amount = Some(order.total_amount);
        }
        order.record_status(new_status, note, Party::Seller, now);

        let order = self.store.update_order(&order, order.version)?;
        tracing::info!(order_id = %order.id, status = %order.status, "Order status updated by seller");

        self.dispatch_transition_effects(&order, Party::Seller).await;
        Ok(order)
    }

    // ========== System Operations ==========

    /// Auto-confirm every order idle in OUT_FOR_DELIVERY beyond the
    /// threshold
    ///
    /// Each order is updated independently; one failure is logged and
    /// does not abort the sweep. Re-runs only touch orders still
    /// matching the selection, so partial completion is safe.
    pub async fn auto_confirm_sweep(&self) -> MarketResult<usize> {
        let now = now_millis();
        let candidates = self.store.orders_with_status(OrderStatus::OutForDelivery)?;
        let mut confirmed = 0;

        for mut order in candidates {
            if !policy::eligible_for_auto_confirm(order.updated_at, now) {
                continue;
            }
            apply_delivery(&mut order, now);
            order.record_status(
                OrderStatus::Delivered,
                Some("Auto-confirmed after 48 hours out for delivery".to_string()),
                Party::System,
                now,
            );
            match self.store.update_order(&order, order.version) {
                Ok(order) => {
                    confirmed += 1;
                    self.dispatch_transition_effects(&order, Party::System).await;
                }
                Err(e) => {
                    tracing::warn!(order_id = %order.id, error = %e, "Auto-confirm failed for order, continuing sweep");
                }
            }
        }

        tracing::info!(confirmed, "Auto-confirmation sweep finished");
        Ok(confirmed)
    }

    // ========== Side Effects (best-effort) ==========

    /// Chat + notification for a freshly placed order
    async fn dispatch_order_placed(&self, order: &Order) {
        let content = messages::order_placed_message(order);
        let payload = status_payload(order);
        if let Err(e) = self
            .bridge
            .send_chat_message(&order.buyer_id, &order.seller_id, &content, Some(payload), None)
            .await
        {
            tracing::warn!(order_id = %order.id, error = %e, "Order-placed chat message failed");
        }

        let buyer_name = self.directory.display_name(&order.buyer_id);
        if let Err(e) = self
            .bridge
            .send_notification(
                &order.seller_id,
                "New order",
                &format!("{} placed order {}", buyer_name, order.order_number),
                order_metadata(order),
            )
            .await
        {
            tracing::warn!(order_id = %order.id, error = %e, "Order-placed notification failed");
        }
    }

    /// Chat message to the conversation + notification to the actor's
    /// counter-party; a delivery additionally schedules the self-deleting
    /// dispute-deadline reminder
    async fn dispatch_transition_effects(&self, order: &Order, actor: Party) {
        let (from_user, to_user) = match actor {
            Party::Buyer => (order.buyer_id.as_str(), order.seller_id.as_str()),
            Party::Seller | Party::System => (order.seller_id.as_str(), order.buyer_id.as_str()),
        };

        let content = messages::status_message(order);
        if let Err(e) = self
            .bridge
            .send_chat_message(from_user, to_user, &content, Some(status_payload(order)), None)
            .await
        {
            tracing::warn!(order_id = %order.id, status = %order.status, error = %e, "Status chat message failed");
        }

        let (title, body) = messages::status_notification(order);
        if let Err(e) = self
            .bridge
            .send_notification(to_user, &title, &body, order_metadata(order))
            .await
        {
            tracing::warn!(order_id = %order.id, status = %order.status, error = %e, "Status notification failed");
        }

        if order.status == OrderStatus::Delivered {
            let reminder = messages::dispute_deadline_reminder(order);
            let payload = MessagePayload::Reminder {
                order_id: order.id.clone(),
            };
            if let Err(e) = self
                .bridge
                .send_chat_message(
                    &order.seller_id,
                    &order.buyer_id,
                    &reminder,
                    Some(payload),
                    Some(policy::REMINDER_TTL_MS),
                )
                .await
            {
                tracing::warn!(order_id = %order.id, error = %e, "Dispute-deadline reminder failed");
            }
        }
    }

    /// Escalate a non-delivery report to the seller
    async fn dispatch_non_delivery_escalation(&self, order: &Order) {
        let content = messages::non_delivery_escalation(order);
        if let Err(e) = self
            .bridge
            .send_chat_message(&order.buyer_id, &order.seller_id, &content, Some(status_payload(order)), None)
            .await
        {
            tracing::warn!(order_id = %order.id, error = %e, "Non-delivery escalation message failed");
        }
        if let Err(e) = self
            .bridge
            .send_notification(
                &order.seller_id,
                "Delivery problem reported",
                &content,
                order_metadata(order),
            )
            .await
        {
            tracing::warn!(order_id = %order.id, error = %e, "Non-delivery escalation notification failed");
        }
    }
}

// ========== Helpers ==========

fn require_buyer(order: &Order, user_id: &str) -> MarketResult<()> {
    if order.is_buyer(user_id) {
        Ok(())
    } else {
        Err(MarketError::Unauthorized(
            "Only the order's buyer may perform this action".to_string(),
        ))
    }
}

fn require_seller(order: &Order, user_id: &str) -> MarketResult<()> {
    if order.is_seller(user_id) {
        Ok(())
    } else {
        Err(MarketError::Unauthorized(
            "Only the order's seller may perform this action".to_string(),
        ))
    }
}

fn validate_address(address: &ShippingAddress) -> MarketResult<()> {
    if address.recipient.trim().is_empty()
        || address.line1.trim().is_empty()
        || address.city.trim().is_empty()
    {
        return Err(MarketError::Validation(
            "Shipping address requires recipient, street and city".to_string(),
        ));
    }
    Ok(())
}

/// Stamp `delivered_at` and settle pay-on-delivery payment
fn apply_delivery(order: &mut Order, now: i64) {
    if order.delivered_at.is_none() {
        order.delivered_at = Some(now);
    }
    if order.payment_method == PaymentMethod::PayOnDelivery
        && order.payment_status == PaymentStatus::Pending
    {
        order.payment_status = PaymentStatus::Completed;
        order.paid_at = Some(now);
    }
}

fn status_payload(order: &Order) -> MessagePayload {
    MessagePayload::OrderStatus {
        order_id: order.id.clone(),
        order_number: order.order_number.clone(),
        status: order.status,
    }
}

fn order_metadata(order: &Order) -> serde_json::Map<String, serde_json::Value> {
    let mut metadata = serde_json::Map::new();
    metadata.insert("order_id".to_string(), order.id.clone().into());
    metadata.insert("order_number".to_string(), order.order_number.clone().into());
    metadata.insert("status".to_string(), order.status.to_string().into());
    metadata
}

#[cfg(test)]
mod tests;
