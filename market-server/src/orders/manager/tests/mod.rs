//! OrdersManager test harness and shared fixtures

mod test_flows;

use super::{CreateOrderRequest, OrdersManager};
use crate::catalog::CatalogStore;
use crate::config::MarketConfig;
use crate::directory::UserDirectory;
use crate::inventory::InventoryService;
use crate::notify::ChatGateway;
use crate::orders::store::OrderStore;
use shared::order::{Order, OrderStatus, PaymentMethod, ShippingAddress, TrackingUpdate};
use shared::product::{Product, SizeVariant};
use shared::user::UserProfile;
use std::sync::Arc;

const BUYER: &str = "buyer-1";
const SELLER: &str = "seller-1";
const HOUR_MS: i64 = 60 * 60 * 1000;

struct Harness {
    manager: OrdersManager,
    gateway: Arc<ChatGateway>,
    store: OrderStore,
    catalog: CatalogStore,
    directory: UserDirectory,
}

fn harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let gateway = Arc::new(ChatGateway::new());
    let store = OrderStore::open_in_memory().unwrap();
    let catalog = CatalogStore::open_in_memory().unwrap();
    let directory = UserDirectory::new();

    let mut seller = UserProfile::new(SELLER, "Ana");
    seller.accepts_pay_on_delivery = true;
    directory.upsert(seller);
    directory.upsert(UserProfile::new(BUYER, "Ben"));

    let inventory = InventoryService::new(catalog.clone(), directory.clone(), gateway.clone());
    let manager = OrdersManager::new(
        store.clone(),
        inventory,
        directory.clone(),
        gateway.clone(),
        MarketConfig::default(),
    );
    Harness {
        manager,
        gateway,
        store,
        catalog,
        directory,
    }
}

fn jacket(m_stock: i32) -> Product {
    Product {
        id: "post-1".to_string(),
        seller_id: SELLER.to_string(),
        title: "Denim Jacket".to_string(),
        price: 300.0,
        image: None,
        quantity_available: Some(m_stock + 4),
        is_out_of_stock: false,
        size_variants: vec![
            SizeVariant {
                size: "M".to_string(),
                quantity: m_stock,
                price: 300.0,
            },
            SizeVariant {
                size: "L".to_string(),
                quantity: 4,
                price: 320.0,
            },
        ],
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        recipient: "Ben".to_string(),
        line1: "1 Main St".to_string(),
        line2: None,
        city: "Metro".to_string(),
        postal_code: Some("10001".to_string()),
        phone: None,
    }
}

/// Seed the catalog and place an order for `quantity` size-M jackets
async fn place(h: &Harness, quantity: i32, payment_method: PaymentMethod) -> Order {
    if h.catalog.get_product("post-1").unwrap().is_none() {
        h.catalog.upsert_product(&jacket(10)).unwrap();
    }
    h.manager
        .create_order(CreateOrderRequest {
            buyer_id: BUYER.to_string(),
            post_id: "post-1".to_string(),
            quantity,
            payment_method,
            shipping_address: address(),
            selected_size: Some("M".to_string()),
        })
        .await
        .unwrap()
}

/// Walk the order through seller-side statuses; supplies tracking for
/// the shipped step
async fn advance(h: &Harness, order_id: &str, path: &[OrderStatus]) -> Order {
    let mut order = h.manager.get_order(order_id).unwrap();
    for status in path {
        let tracking = if *status == OrderStatus::Shipped {
            TrackingUpdate {
                tracking_number: Some("TRK-1001".to_string()),
                ..Default::default()
            }
        } else {
            TrackingUpdate::default()
        };
        order = h
            .manager
            .update_order_status(order_id, SELLER, *status, tracking, None)
            .await
            .unwrap();
    }
    order
}

/// Edit the stored record directly (backdating timestamps and the like)
fn mutate_stored(h: &Harness, order_id: &str, f: impl FnOnce(&mut Order)) -> Order {
    let mut order = h.manager.get_order(order_id).unwrap();
    f(&mut order);
    h.store.update_order(&order, order.version).unwrap()
}
