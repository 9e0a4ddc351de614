//! Order creation and the seller-driven forward path

use super::*;
use crate::error::MarketError;
use shared::order::{Party, PaymentStatus};

#[tokio::test]
async fn test_create_order_free_shipping_at_threshold() {
    let h = harness();
    let order = place(&h, 2, PaymentMethod::PayOnDelivery).await;

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal, 600.0);
    assert_eq!(order.shipping_charge, 0.0);
    assert_eq!(order.total_amount, 600.0);
    assert_eq!(order.version, 0);
    assert_eq!(order.status_history.len(), 1);
    assert_eq!(order.items[0].title, "Denim Jacket (M)");
    assert!(order.order_number.starts_with("ORD-"));
    assert!(order.order_number.ends_with("-00001"));

    // Stock decremented at creation
    let product = h.catalog.get_product("post-1").unwrap().unwrap();
    assert_eq!(product.size_variants[0].quantity, 8);

    // Conversation opened, order-placed message and seller notification sent
    let chat_id = order.chat_id.clone().unwrap();
    let messages = h.gateway.messages(&chat_id);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].content.contains(&order.order_number));
    let notified = h.gateway.notifications_for(SELLER);
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0].title, "New order");
    assert!(notified[0].body.contains("Ben"));
}

#[tokio::test]
async fn test_create_order_flat_shipping_below_threshold() {
    let h = harness();
    let order = place(&h, 1, PaymentMethod::PayOnDelivery).await;
    assert_eq!(order.subtotal, 300.0);
    assert_eq!(order.shipping_charge, 50.0);
    assert_eq!(order.total_amount, 350.0);
}

#[tokio::test]
async fn test_fractional_prices_round_to_cents() {
    let h = harness();
    h.catalog
        .upsert_product(&Product {
            id: "post-9".to_string(),
            seller_id: SELLER.to_string(),
            title: "Sticker Pack".to_string(),
            price: 0.1,
            image: None,
            quantity_available: None,
            is_out_of_stock: false,
            size_variants: vec![],
        })
        .unwrap();

    let order = h
        .manager
        .create_order(CreateOrderRequest {
            buyer_id: BUYER.to_string(),
            post_id: "post-9".to_string(),
            quantity: 3,
            payment_method: PaymentMethod::PayOnDelivery,
            shipping_address: address(),
            selected_size: None,
        })
        .await
        .unwrap();

    // 0.1 * 3 must not leak binary-float drift into the stored totals
    assert_eq!(order.subtotal, 0.3);
    assert_eq!(order.shipping_charge, 50.0);
    assert_eq!(order.total_amount, 50.3);
}

#[tokio::test]
async fn test_order_numbers_are_sequential() {
    let h = harness();
    let first = place(&h, 1, PaymentMethod::PayOnDelivery).await;
    let second = place(&h, 1, PaymentMethod::PayOnDelivery).await;
    assert!(first.order_number.ends_with("-00001"));
    assert!(second.order_number.ends_with("-00002"));
}

#[tokio::test]
async fn test_create_order_rejections() {
    let h = harness();
    h.catalog.upsert_product(&jacket(2)).unwrap();

    let base = CreateOrderRequest {
        buyer_id: BUYER.to_string(),
        post_id: "post-1".to_string(),
        quantity: 1,
        payment_method: PaymentMethod::PayOnDelivery,
        shipping_address: address(),
        selected_size: Some("M".to_string()),
    };

    let unknown = CreateOrderRequest {
        post_id: "missing".to_string(),
        ..base.clone()
    };
    assert!(matches!(
        h.manager.create_order(unknown).await,
        Err(MarketError::NotFound(_))
    ));

    let own_listing = CreateOrderRequest {
        buyer_id: SELLER.to_string(),
        ..base.clone()
    };
    assert!(matches!(
        h.manager.create_order(own_listing).await,
        Err(MarketError::Validation(_))
    ));

    let blank_address = CreateOrderRequest {
        shipping_address: ShippingAddress::default(),
        ..base.clone()
    };
    assert!(matches!(
        h.manager.create_order(blank_address).await,
        Err(MarketError::Validation(_))
    ));

    let over_stock = CreateOrderRequest {
        quantity: 5,
        ..base
    };
    assert!(matches!(
        h.manager.create_order(over_stock).await,
        Err(MarketError::InsufficientStock {
            requested: 5,
            available: 2
        })
    ));
}

#[tokio::test]
async fn test_pay_on_delivery_requires_seller_opt_in() {
    let h = harness();
    h.directory.upsert(UserProfile::new("seller-2", "Cara"));
    let mut product = jacket(5);
    product.id = "post-2".to_string();
    product.seller_id = "seller-2".to_string();
    h.catalog.upsert_product(&product).unwrap();

    let request = CreateOrderRequest {
        buyer_id: BUYER.to_string(),
        post_id: "post-2".to_string(),
        quantity: 1,
        payment_method: PaymentMethod::PayOnDelivery,
        shipping_address: address(),
        selected_size: Some("M".to_string()),
    };
    assert!(matches!(
        h.manager.create_order(request.clone()).await,
        Err(MarketError::Validation(_))
    ));

    // Online payment is always accepted
    let online = CreateOrderRequest {
        payment_method: PaymentMethod::Online,
        ..request
    };
    let order = h.manager.create_order(online).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn test_full_lifecycle_to_delivered() {
    let h = harness();
    let order = place(&h, 1, PaymentMethod::PayOnDelivery).await;
    let order = advance(
        &h,
        &order.id,
        &[
            OrderStatus::Confirmed,
            OrderStatus::ShippingInitiated,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ],
    )
    .await;

    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.version, 5);
    assert_eq!(order.status_history.len(), 6);
    assert!(order.delivered_at.is_some());
    assert_eq!(order.tracking_number.as_deref(), Some("TRK-1001"));
    // Pay-on-delivery settles on delivery
    assert_eq!(order.payment_status, PaymentStatus::Completed);
    assert!(order.paid_at.is_some());
    // Every entry was stamped by the seller except the initial one
    assert!(order.status_history[1..]
        .iter()
        .all(|e| e.updated_by == Party::Seller));

    // Placed + five status messages + the dispute-deadline reminder
    let chat_id = order.chat_id.clone().unwrap();
    let messages = h.gateway.messages(&chat_id);
    assert_eq!(messages.len(), 7);
    assert!(messages[2].content.contains("Cancellation is no longer possible"));
    assert!(messages[3].content.contains("TRK-1001"));
    let reminder = messages.last().unwrap();
    assert!(reminder.content.contains("dispute"));
    assert!(reminder.expires_at.is_some());
}

#[tokio::test]
async fn test_shipped_requires_tracking_number() {
    let h = harness();
    let order = place(&h, 1, PaymentMethod::PayOnDelivery).await;
    advance(&h, &order.id, &[OrderStatus::Confirmed]).await;

    let result = h
        .manager
        .update_order_status(
            &order.id,
            SELLER,
            OrderStatus::Shipped,
            TrackingUpdate::default(),
            None,
        )
        .await;
    assert!(matches!(result, Err(MarketError::Validation(_))));

    // Order untouched by the failed update
    let stored = h.manager.get_order(&order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Confirmed);
    assert_eq!(stored.status_history.len(), 2);
}

#[tokio::test]
async fn test_update_status_rejects_buyer_reserved_targets() {
    let h = harness();
    let order = place(&h, 1, PaymentMethod::PayOnDelivery).await;

    for target in [
        OrderStatus::Cancelled,
        OrderStatus::Disputed,
        OrderStatus::RefundRequested,
    ] {
        let result = h
            .manager
            .update_order_status(&order.id, SELLER, target, TrackingUpdate::default(), None)
            .await;
        assert!(matches!(result, Err(MarketError::Validation(_))), "{target}");
    }
}

#[tokio::test]
async fn test_update_status_enforces_matrix_and_role() {
    let h = harness();
    let order = place(&h, 1, PaymentMethod::PayOnDelivery).await;

    // Pending cannot jump straight to shipped
    let result = h
        .manager
        .update_order_status(
            &order.id,
            SELLER,
            OrderStatus::Shipped,
            TrackingUpdate {
                tracking_number: Some("TRK-1001".to_string()),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(
        result,
        Err(MarketError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipped
        })
    ));

    // The buyer cannot drive the seller-side progression
    let result = h
        .manager
        .update_order_status(
            &order.id,
            BUYER,
            OrderStatus::Confirmed,
            TrackingUpdate::default(),
            None,
        )
        .await;
    assert!(matches!(result, Err(MarketError::Unauthorized(_))));
}

#[tokio::test]
async fn test_stale_writer_surfaces_as_conflict() {
    let h = harness();
    // Two actors load the same version-0 order
    let placed = place(&h, 1, PaymentMethod::PayOnDelivery).await;

    // One commits first
    h.manager.cancel_order(&placed.id, BUYER, None).await.unwrap();

    // The other writes back its now-stale copy and gets a retryable
    // conflict in the domain taxonomy, not a raw storage error
    let mut stale = placed.clone();
    stale.record_note(
        "hold for pickup".to_string(),
        Party::Buyer,
        shared::util::now_millis(),
    );
    let err: MarketError = h
        .store
        .update_order(&stale, placed.version)
        .unwrap_err()
        .into();
    assert!(matches!(err, MarketError::Conflict(_)));
    assert_eq!(err.kind(), "CONFLICT");

    // The winner's commit is untouched by the rejected write
    let stored = h.manager.get_order(&placed.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Cancelled);
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn test_refund_flow() {
    let h = harness();
    let order = place(&h, 1, PaymentMethod::PayOnDelivery).await;

    // Refunds only apply to delivered orders
    assert!(matches!(
        h.manager
            .request_refund(&order.id, BUYER, "damaged".to_string())
            .await,
        Err(MarketError::InvalidTransition { .. })
    ));

    let order = advance(
        &h,
        &order.id,
        &[
            OrderStatus::Confirmed,
            OrderStatus::ShippingInitiated,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ],
    )
    .await;

    assert!(matches!(
        h.manager.request_refund(&order.id, BUYER, "  ".to_string()).await,
        Err(MarketError::Validation(_))
    ));

    let order = h
        .manager
        .request_refund(&order.id, BUYER, "Item arrived damaged".to_string())
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::RefundRequested);
    assert_eq!(order.refund_reason.as_deref(), Some("Item arrived damaged"));

    // Seller settles the refund through the status update path
    let order = h
        .manager
        .update_order_status(
            &order.id,
            SELLER,
            OrderStatus::Refunded,
            TrackingUpdate::default(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Refunded);
    assert_eq!(order.refund_amount, Some(order.total_amount));
}
