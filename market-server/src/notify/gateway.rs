//! In-memory chat gateway
//!
//! Reference implementation of `NotificationBridge`: conversations are
//! keyed by the unordered user pair, messages are appended in order and
//! broadcast to subscribed real-time clients. TTL-bearing messages are
//! filtered out of reads once expired and physically removed by
//! `sweep_expired`.

use super::NotificationBridge;
use async_trait::async_trait;
use dashmap::DashMap;
use shared::chat::{ChatMessage, MessagePayload, Notification};
use shared::util::now_millis;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Real-time fan-out channel capacity
const MESSAGE_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug)]
struct Conversation {
    id: String,
    messages: Vec<ChatMessage>,
}

/// In-memory conversations + notification log
#[derive(Clone)]
pub struct ChatGateway {
    /// Keyed by the sorted user pair
    conversations: Arc<DashMap<String, Conversation>>,
    /// conversation_id -> pair key
    by_id: Arc<DashMap<String, String>>,
    notifications: Arc<DashMap<String, Vec<Notification>>>,
    message_tx: broadcast::Sender<ChatMessage>,
}

impl Default for ChatGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatGateway {
    pub fn new() -> Self {
        let (message_tx, _) = broadcast::channel(MESSAGE_CHANNEL_CAPACITY);
        Self {
            conversations: Arc::new(DashMap::new()),
            by_id: Arc::new(DashMap::new()),
            notifications: Arc::new(DashMap::new()),
            message_tx,
        }
    }

    /// Subscribe to real-time message pushes
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.message_tx.subscribe()
    }

    fn pair_key(user_a: &str, user_b: &str) -> String {
        let (first, second) = if user_a <= user_b {
            (user_a, user_b)
        } else {
            (user_b, user_a)
        };
        format!("{}#{}", first, second)
    }

    fn conversation_id_for(&self, user_a: &str, user_b: &str) -> String {
        let key = Self::pair_key(user_a, user_b);
        let entry = self.conversations.entry(key.clone()).or_insert_with(|| {
            let id = uuid::Uuid::new_v4().to_string();
            tracing::debug!(conversation_id = %id, pair = %key, "Conversation created");
            Conversation {
                id,
                messages: Vec::new(),
            }
        });
        let id = entry.id.clone();
        drop(entry);
        self.by_id.insert(id.clone(), key);
        id
    }

    /// Messages of a conversation, oldest first, expired ones filtered
    pub fn messages(&self, conversation_id: &str) -> Vec<ChatMessage> {
        let now = now_millis();
        let Some(key) = self.by_id.get(conversation_id) else {
            return Vec::new();
        };
        self.conversations
            .get(key.value())
            .map(|c| {
                c.messages
                    .iter()
                    .filter(|m| !m.is_expired(now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Physically remove expired messages; returns how many were dropped
    pub fn sweep_expired(&self, now: i64) -> usize {
        let mut removed = 0;
        for mut entry in self.conversations.iter_mut() {
            let before = entry.messages.len();
            entry.messages.retain(|m| !m.is_expired(now));
            removed += before - entry.messages.len();
        }
        if removed > 0 {
            tracing::debug!(removed, "Expired chat messages swept");
        }
        removed
    }

    /// Notifications delivered to a user, oldest first
    pub fn notifications_for(&self, user_id: &str) -> Vec<Notification> {
        self.notifications
            .get(user_id)
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationBridge for ChatGateway {
    async fn ensure_conversation(&self, user_a: &str, user_b: &str) -> anyhow::Result<String> {
        Ok(self.conversation_id_for(user_a, user_b))
    }

    async fn send_chat_message(
        &self,
        from_user: &str,
        to_user: &str,
        content: &str,
        payload: Option<MessagePayload>,
        ttl_ms: Option<i64>,
    ) -> anyhow::Result<String> {
        let now = now_millis();
        let conversation_id = self.conversation_id_for(from_user, to_user);
        let message = ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.clone(),
            from_user: from_user.to_string(),
            to_user: to_user.to_string(),
            content: content.to_string(),
            payload,
            sent_at: now,
            expires_at: ttl_ms.map(|ttl| now + ttl),
        };

        let key = Self::pair_key(from_user, to_user);
        if let Some(mut conversation) = self.conversations.get_mut(&key) {
            conversation.messages.push(message.clone());
        }

        // Push to connected clients; nobody listening is not an error
        let _ = self.message_tx.send(message.clone());

        tracing::debug!(
            conversation_id = %conversation_id,
            message_id = %message.id,
            "Chat message appended"
        );
        Ok(message.id)
    }

    async fn send_notification(
        &self,
        user_id: &str,
        title: &str,
        body: &str,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> anyhow::Result<()> {
        let notification = Notification {
            user_id: user_id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            metadata,
            sent_at: now_millis(),
        };
        self.notifications
            .entry(user_id.to_string())
            .or_default()
            .push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_conversation_is_shared_across_directions() {
        let gateway = ChatGateway::new();
        let a = gateway.ensure_conversation("buyer-1", "seller-1").await.unwrap();
        let b = gateway.ensure_conversation("seller-1", "buyer-1").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_messages_append_in_order() {
        let gateway = ChatGateway::new();
        gateway
            .send_chat_message("buyer-1", "seller-1", "first", None, None)
            .await
            .unwrap();
        gateway
            .send_chat_message("seller-1", "buyer-1", "second", None, None)
            .await
            .unwrap();

        let conversation = gateway.ensure_conversation("buyer-1", "seller-1").await.unwrap();
        let messages = gateway.messages(&conversation);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }

    #[tokio::test]
    async fn test_realtime_push() {
        let gateway = ChatGateway::new();
        let mut rx = gateway.subscribe();
        gateway
            .send_chat_message("buyer-1", "seller-1", "hello", None, None)
            .await
            .unwrap();
        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.content, "hello");
    }

    #[tokio::test]
    async fn test_ttl_message_expires_and_sweeps() {
        let gateway = ChatGateway::new();
        gateway
            .send_chat_message("buyer-1", "seller-1", "reminder", None, Some(-1))
            .await
            .unwrap();
        gateway
            .send_chat_message("buyer-1", "seller-1", "durable", None, None)
            .await
            .unwrap();

        let conversation = gateway.ensure_conversation("buyer-1", "seller-1").await.unwrap();
        // Already-expired message is filtered from reads
        let messages = gateway.messages(&conversation);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "durable");

        // And physically removed by the sweep
        assert_eq!(gateway.sweep_expired(now_millis()), 1);
        assert_eq!(gateway.sweep_expired(now_millis()), 0);
    }

    #[tokio::test]
    async fn test_notifications_recorded_per_user() {
        let gateway = ChatGateway::new();
        gateway
            .send_notification("seller-1", "Order update", "body", Default::default())
            .await
            .unwrap();
        assert_eq!(gateway.notifications_for("seller-1").len(), 1);
        assert!(gateway.notifications_for("buyer-1").is_empty());
    }
}
