//! Shared types for the marketplace order engine
//!
//! Common types used across crates: the order record and its lifecycle
//! states, product stock shapes, chat/notification payloads, and user
//! profile snapshots.

pub mod chat;
pub mod order;
pub mod product;
pub mod user;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
