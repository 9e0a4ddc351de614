//! Marketplace order lifecycle engine
//!
//! Manages the buyer-seller transaction from creation through delivery
//! confirmation: inventory reservation, status progression with a fixed
//! transition matrix, time-boxed cancellation/dispute windows, and the
//! chat/notification side effects that accompany every state change.
//!
//! HTTP framing, auth, payment-gateway verification and media handling
//! are external collaborators and live outside this crate.

pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod inventory;
pub mod notify;
pub mod orders;

// Re-exports
pub use config::MarketConfig;
pub use error::{MarketError, MarketResult};
pub use orders::manager::{CreateOrderRequest, OrdersManager};
