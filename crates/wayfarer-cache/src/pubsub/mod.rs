//! Redis Pub/Sub module.

mod channels;
mod publisher;

pub use channels::{PubSubChannel, USER_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
