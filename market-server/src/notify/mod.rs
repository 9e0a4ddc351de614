//! Notification bridge (external collaborator interface)
//!
//! The engine dispatches every chat message and push notification
//! through this seam. The contract is at-least-once and fire-and-forget:
//! callers log failures and never roll back the order mutation that
//! triggered them.

pub mod gateway;

pub use gateway::ChatGateway;

use async_trait::async_trait;
use shared::chat::MessagePayload;

/// Abstract interface to chat-message emission and push notifications
#[async_trait]
pub trait NotificationBridge: Send + Sync {
    /// Get-or-create the conversation between two users
    ///
    /// Returns the conversation id; the pair is unordered.
    async fn ensure_conversation(&self, user_a: &str, user_b: &str) -> anyhow::Result<String>;

    /// Append a message to the pair's conversation and push it to any
    /// connected real-time clients of both participants
    ///
    /// `ttl_ms` makes the message self-deleting: it is removed once the
    /// TTL elapses. Returns the message id.
    async fn send_chat_message(
        &self,
        from_user: &str,
        to_user: &str,
        content: &str,
        payload: Option<MessagePayload>,
        ttl_ms: Option<i64>,
    ) -> anyhow::Result<String>;

    /// Push/in-app notification to a single user
    async fn send_notification(
        &self,
        user_id: &str,
        title: &str,
        body: &str,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> anyhow::Result<()>;
}
