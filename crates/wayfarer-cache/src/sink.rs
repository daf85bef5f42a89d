//! Redis-backed notification sink
//!
//! Publishes each delivered notification on its recipient's `user:<id>` channel.
//! Nobody listening is not an error: pub/sub is fire-and-forget, and the stored
//! notification is what clients page through.

use async_trait::async_trait;
use tracing::instrument;

use wayfarer_core::entities::Notification;
use wayfarer_core::error::DomainError;
use wayfarer_core::traits::{NotificationSink, RepoResult};

use crate::pool::RedisPool;
use crate::pubsub::Publisher;

/// Event type carried on the user channel
pub const NOTIFICATION_CREATE: &str = "NOTIFICATION_CREATE";

#[derive(Clone)]
pub struct RedisNotificationSink {
    publisher: Publisher,
}

impl RedisNotificationSink {
    pub fn new(pool: RedisPool) -> Self {
        Self {
            publisher: Publisher::new(pool),
        }
    }
}

/// Wire shape pushed to live clients
pub(crate) fn notification_payload(notification: &Notification) -> serde_json::Value {
    serde_json::json!({
        "id": notification.id,
        "senderId": notification.sender_id,
        "kind": notification.kind,
        "resourceType": notification.resource_type,
        "resourceId": notification.resource_id,
        "isRead": notification.is_read,
        "createdAt": notification.created_at,
    })
}

#[async_trait]
impl NotificationSink for RedisNotificationSink {
    #[instrument(skip(self, notification), fields(notification_id = %notification.id, recipient_id = %notification.recipient_id))]
    async fn notify(&self, notification: &Notification) -> RepoResult<()> {
        self.publisher
            .publish_to_user(
                notification.recipient_id,
                NOTIFICATION_CREATE,
                notification_payload(notification),
            )
            .await
            .map(|_| ())
            .map_err(|e| DomainError::CacheError(e.to_string()))
    }
}
