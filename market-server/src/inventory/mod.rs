//! Inventory reservation service
//!
//! Validates and decrements product stock at order-creation time and
//! raises low-stock alerts to the seller. The decrement itself is the
//! catalog store's atomic conditional update; this service adds input
//! validation and the best-effort alerting around it.
//!
//! Stock is never restored here when an order is later cancelled,
//! refunded or disputed.

use crate::catalog::{CatalogStore, StockReservation};
use crate::directory::UserDirectory;
use crate::error::{MarketError, MarketResult};
use crate::notify::NotificationBridge;
use crate::orders::messages;
use crate::orders::money;
use std::sync::Arc;

/// Inventory reservation at order-creation time
#[derive(Clone)]
pub struct InventoryService {
    catalog: CatalogStore,
    directory: UserDirectory,
    bridge: Arc<dyn NotificationBridge>,
}

impl InventoryService {
    pub fn new(
        catalog: CatalogStore,
        directory: UserDirectory,
        bridge: Arc<dyn NotificationBridge>,
    ) -> Self {
        Self {
            catalog,
            directory,
            bridge,
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Reserve `quantity` units of a product (optionally a size variant)
    ///
    /// On success the stock has been decremented and the returned
    /// reservation carries the price/title snapshot for the order line.
    pub async fn reserve(
        &self,
        post_id: &str,
        selected_size: Option<&str>,
        quantity: i32,
    ) -> MarketResult<StockReservation> {
        let product = self
            .catalog
            .get_product(post_id)?
            .ok_or_else(|| MarketError::NotFound(format!("Product not found: {}", post_id)))?;
        money::validate_purchase(product.unit_price(selected_size), quantity)?;

        let reservation = self.catalog.reserve_stock(post_id, selected_size, quantity)?;
        tracing::info!(
            post_id,
            quantity,
            selected_size = ?selected_size,
            remaining = ?reservation.remaining_unit,
            "Stock reserved"
        );

        self.maybe_alert_low_stock(&reservation, selected_size).await;
        Ok(reservation)
    }

    /// Low-stock alerts to the seller; never fail the reservation
    async fn maybe_alert_low_stock(&self, reservation: &StockReservation, size: Option<&str>) {
        let Some(remaining) = reservation.remaining_unit else {
            return;
        };
        let threshold = self
            .directory
            .low_stock_threshold(&reservation.product.seller_id);

        if remaining == 0 || remaining <= threshold {
            let body = messages::low_stock_alert(&reservation.product.title, size, remaining);
            self.send_stock_alert(reservation, &body, size, remaining).await;
        }

        // The sold-out size was the listing's last stock
        if size.is_some() && reservation.remaining_aggregate == Some(0) {
            let body = messages::low_stock_alert(&reservation.product.title, None, 0);
            self.send_stock_alert(reservation, &body, None, 0).await;
        }
    }

    async fn send_stock_alert(
        &self,
        reservation: &StockReservation,
        body: &str,
        size: Option<&str>,
        remaining: i32,
    ) {
        let mut metadata = serde_json::Map::new();
        metadata.insert("post_id".to_string(), reservation.product.id.clone().into());
        metadata.insert("remaining".to_string(), remaining.into());
        if let Some(size) = size {
            metadata.insert("size".to_string(), size.into());
        }

        if let Err(e) = self
            .bridge
            .send_notification(&reservation.product.seller_id, "Low stock", body, metadata)
            .await
        {
            tracing::warn!(post_id = %reservation.product.id, error = %e, "Low-stock alert failed");
        }
    }
}
