//! # wayfarer-cache
//!
//! Redis layer for pushing delivered notifications to live clients.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Per-user channels (`user:<id>`) carrying [`PubSubEvent`]s
//! - **Notification Sink**: [`RedisNotificationSink`] implements the core `NotificationSink` port
//!
//! ## Example
//!
//! ```ignore
//! use wayfarer_cache::{RedisNotificationSink, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(&RedisPoolConfig::default())?;
//! let sink = RedisNotificationSink::new(pool);
//! sink.notify(&notification).await?;
//! ```

pub mod pool;
pub mod pubsub;
pub mod sink;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export pubsub types
pub use pubsub::{PubSubChannel, PubSubEvent, Publisher, USER_CHANNEL_PREFIX};

pub use sink::{RedisNotificationSink, NOTIFICATION_CREATE};
