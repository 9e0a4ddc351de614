//! redb-based storage for orders and daily counters
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` (JSON) | Order records |
//! | `order_counters` | `YYYYMMDD` | `u64` | Per-date order-number sequence |
//!
//! # Concurrency
//!
//! `next_daily_sequence` performs its increment-and-return inside a single
//! write transaction, so concurrent creations on the same date can never
//! observe the same sequence number. `update_order` compares the stored
//! `version` before writing and rejects stale writers.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::order::{Order, OrderStatus};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for per-date order counters: key = YYYYMMDD, value = last sequence
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("order_counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Order already exists: {0}")]
    DuplicateOrder(String),

    #[error("Version conflict on order {order_id}: expected {expected}, found {actual}")]
    VersionConflict {
        order_id: String,
        expected: u64,
        actual: u64,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open or create the database at the given path
    ///
    /// redb commits with immediate durability: once `commit()` returns the
    /// record is persistent and the file is in a consistent state.
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
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    // ========== Order Operations ==========

    /// Insert a new order
    ///
    /// Fails with `DuplicateOrder` if the id is already taken.
    pub fn insert_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            if table.get(order.id.as_str())?.is_some() {
                return Err(StorageError::DuplicateOrder(order.id.clone()));
            }
            let value = serde_json::to_vec(order)?;
            table.insert(order.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Write back a mutated order, guarded by its optimistic version
    ///
    /// `expected_version` is the version the caller loaded. The stored
    /// order must still carry it; on mismatch nothing is written and
    /// `VersionConflict` is returned. On success the order is persisted
    /// with `version = expected_version + 1` and the bumped record is
    /// returned.
    pub fn update_order(&self, order: &Order, expected_version: u64) -> StorageResult<Order> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let current: Order = match table.get(order.id.as_str())? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StorageError::OrderNotFound(order.id.clone())),
            };
            if current.version != expected_version {
                return Err(StorageError::VersionConflict {
                    order_id: order.id.clone(),
                    expected: expected_version,
                    actual: current.version,
                });
            }
            let mut updated = order.clone();
            updated.version = expected_version + 1;
            let value = serde_json::to_vec(&updated)?;
            table.insert(order.id.as_str(), value.as_slice())?;
            updated
        };
        txn.commit()?;
        Ok(updated)
    }

    /// All orders currently in `status`
    ///
    /// Full scan; used by the auto-confirmation sweep.
    pub fn orders_with_status(&self, status: OrderStatus) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.status == status {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    // ========== Daily Order Counter ==========

    /// Increment and return the sequence for a date key (atomic)
    ///
    /// The counter row is created lazily on first use for a date and only
    /// ever incremented. Read and write happen inside one write
    /// transaction, never as a separate read followed by a write.
    pub fn next_daily_sequence(&self, date_key: &str) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let next = {
            let mut table = txn.open_table(COUNTERS_TABLE)?;
            let current = table.get(date_key)?.map(|g| g.value()).unwrap_or(0);
            let next = current + 1;
            table.insert(date_key, next)?;
            next
        };
        txn.commit()?;
        Ok(next)
    }

    /// Current sequence for a date key without incrementing
    pub fn current_daily_sequence(&self, date_key: &str) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table.get(date_key)?.map(|g| g.value()).unwrap_or(0))
    }
}
