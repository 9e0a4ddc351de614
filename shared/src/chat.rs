//! Chat and notification payloads
//!
//! Only the send/receive contract lives here; transport and storage of
//! messages belong to the gateway that implements the bridge.

use crate::order::OrderStatus;
use serde::{Deserialize, Serialize};

/// Structured payload attached to a chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessagePayload {
    /// Machine-readable order status update alongside the rendered text
    OrderStatus {
        order_id: String,
        order_number: String,
        status: OrderStatus,
    },
    /// Self-deleting reminder (e.g. dispute-deadline notice)
    Reminder { order_id: String },
}

/// A single chat message between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Message ID (assigned by the gateway)
    pub id: String,
    /// Conversation this message belongs to
    pub conversation_id: String,
    pub from_user: String,
    pub to_user: String,
    /// Rendered human-readable content
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<MessagePayload>,
    /// Unix milliseconds
    pub sent_at: i64,
    /// When set, the message is removed once this instant passes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl ChatMessage {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Push/in-app notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub user_id: String,
    pub title: String,
    pub body: String,
    /// Free-form metadata (order id, status, ...)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub sent_at: i64,
}
