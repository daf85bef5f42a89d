//! Redis Pub/Sub publisher.

use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use wayfarer_core::Snowflake;

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;

/// Envelope written to a channel: `{"event_type": "...", "data": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent<T = serde_json::Value> {
    pub event_type: String,
    pub data: T,
}

impl<T: Serialize> PubSubEvent<T> {
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: T) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Returns how many subscribers received the event
    pub async fn publish<T: Serialize>(
        &self,
        channel: &PubSubChannel,
        event: &PubSubEvent<T>,
    ) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let channel_name = channel.name();

        let mut conn = self.pool.get().await?;
        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers,
            "Published event"
        );

        Ok(receivers)
    }

    pub async fn publish_to_user<T: Serialize>(
        &self,
        user_id: Snowflake,
        event_type: &str,
        data: T,
    ) -> RedisResult<u32> {
        self.publish(&PubSubChannel::user(user_id), &PubSubEvent::new(event_type, data))
            .await
    }
}
