//! Catalog store - product lookup and the atomic stock decrement
//!
//! Stock mutation happens inside a single redb write transaction with the
//! availability check, so "decrement only if current >= requested" holds
//! and at most one of two racing purchases of the last unit can succeed.

use crate::error::{MarketError, MarketResult};
use crate::orders::store::{StorageError, StorageResult};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::product::Product;
use std::path::Path;
use std::sync::Arc;

/// Table for products: key = post_id, value = JSON-serialized Product
const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");

/// Outcome of a successful stock reservation
#[derive(Debug, Clone)]
pub struct StockReservation {
    /// Product snapshot after the decrement
    pub product: Product,
    /// Unit price honoring the selected variant
    pub unit_price: f64,
    /// Remaining stock of the affected unit (variant or aggregate);
    /// `None` for unmanaged inventory
    pub remaining_unit: Option<i32>,
    /// Remaining aggregate stock; `None` for unmanaged inventory
    pub remaining_aggregate: Option<i32>,
}

/// Product storage backed by redb
#[derive(Clone)]
pub struct CatalogStore {
    db: Arc<Database>,
}

impl CatalogStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Insert or replace a product
    pub fn upsert_product(&self, product: &Product) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let value = serde_json::to_vec(product)?;
            table.insert(product.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a product by post id
    pub fn get_product(&self, post_id: &str) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        match table.get(post_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Conditionally decrement stock for a purchase (atomic)
    ///
    /// Validation, decrement and write-back happen in one write
    /// transaction. Any failure leaves the product unchanged.
    pub fn reserve_stock(
        &self,
        post_id: &str,
        selected_size: Option<&str>,
        quantity: i32,
    ) -> MarketResult<StockReservation> {
        let txn = self.db.begin_write().map_err(StorageError::from)?;
        let reservation = {
            let mut table = txn.open_table(PRODUCTS_TABLE).map_err(StorageError::from)?;
            let mut product: Product = match table.get(post_id).map_err(StorageError::from)? {
                Some(value) => {
                    serde_json::from_slice(value.value()).map_err(StorageError::from)?
                }
                None => return Err(StorageError::ProductNotFound(post_id.to_string()).into()),
            };

            let unit_price = product.unit_price(selected_size);

            let (remaining_unit, remaining_aggregate) = if product.has_variants() {
                let size = selected_size.ok_or_else(|| {
                    MarketError::Validation(format!(
                        "Product {} requires a size selection",
                        post_id
                    ))
                })?;
                let variant = product
                    .size_variants
                    .iter_mut()
                    .find(|v| v.size == size)
                    .filter(|v| v.quantity > 0)
                    .ok_or_else(|| {
                        MarketError::OutOfStock(format!(
                            "Size {} of product {} is out of stock",
                            size, post_id
                        ))
                    })?;
                if quantity > variant.quantity {
                    return Err(MarketError::InsufficientStock {
                        requested: quantity,
                        available: variant.quantity,
                    });
                }
                variant.quantity -= quantity;
                let remaining_unit = variant.quantity;
                // Aggregate is always the sum across variants
                let aggregate = product.variant_total();
                product.quantity_available = Some(aggregate);
                product.is_out_of_stock = aggregate == 0;
                (Some(remaining_unit), Some(aggregate))
            } else if let Some(available) = product.quantity_available {
                if product.is_out_of_stock || available == 0 {
                    return Err(MarketError::OutOfStock(format!(
                        "Product {} is out of stock",
                        post_id
                    )));
                }
                if quantity > available {
                    return Err(MarketError::InsufficientStock {
                        requested: quantity,
                        available,
                    });
                }
                let remaining = available - quantity;
                product.quantity_available = Some(remaining);
                product.is_out_of_stock = remaining == 0;
                (Some(remaining), Some(remaining))
            } else {
                // Unmanaged inventory: always succeeds, nothing to mutate
                (None, None)
            };

            let value = serde_json::to_vec(&product).map_err(StorageError::from)?;
            table
                .insert(post_id, value.as_slice())
                .map_err(StorageError::from)?;
            StockReservation {
                product,
                unit_price,
                remaining_unit,
                remaining_aggregate,
            }
        };
        txn.commit().map_err(StorageError::from)?;
        Ok(reservation)
    }
}
