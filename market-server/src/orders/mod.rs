//! Order lifecycle module
//!
//! - **manager**: `OrdersManager` orchestrating every order operation
//! - **store**: redb-based persistence for orders and daily counters
//! - **transitions**: the fixed status transition matrix (pure)
//! - **policy**: time-window predicates (pure)
//! - **messages**: chat/notification text rendering (pure)
//! - **number**: unique human-readable order number generation
//!
//! # Operation Flow
//!
//! ```text
//! caller -> OrdersManager operation
//!     |- precondition checks (policy windows, actor role)
//!     |- transition matrix check
//!     |- mutate Order via store (compare-and-swap on version)
//!     `- dispatch side effects via NotificationBridge (best-effort)
//! ```

pub mod manager;
pub mod messages;
pub mod money;
pub mod number;
pub mod policy;
pub mod store;
pub mod transitions;

// Re-exports
pub use manager::{CreateOrderRequest, OrdersManager};
pub use number::OrderNumberGenerator;
pub use store::OrderStore;
