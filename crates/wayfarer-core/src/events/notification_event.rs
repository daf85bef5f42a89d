//! Notification events - what an interaction wants the recipient to hear about
//!
//! Events are written to the outbox inside the interaction's transaction and
//! delivered later by the relay. They are never delivered inline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Notification, NotificationKind, ResourceType};
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub recipient_id: Snowflake,
    pub sender_id: Snowflake,
    pub kind: NotificationKind,
    pub resource_type: ResourceType,
    pub resource_id: Snowflake,
}

impl NotificationEvent {
    /// Build an event, or `None` when the actor would be notifying themself.
    pub fn for_recipient(
        recipient_id: Snowflake,
        sender_id: Snowflake,
        kind: NotificationKind,
        resource_type: ResourceType,
        resource_id: Snowflake,
    ) -> Option<Self> {
        (recipient_id != sender_id).then_some(Self {
            recipient_id,
            sender_id,
            kind,
            resource_type,
            resource_id,
        })
    }

    pub fn post_upvote(post_author: Snowflake, voter: Snowflake, post_id: Snowflake) -> Option<Self> {
        Self::for_recipient(
            post_author,
            voter,
            NotificationKind::PostUpvote,
            ResourceType::Post,
            post_id,
        )
    }

    pub fn new_follower(followed: Snowflake, follower: Snowflake) -> Option<Self> {
        Self::for_recipient(
            followed,
            follower,
            NotificationKind::NewFollower,
            ResourceType::User,
            follower,
        )
    }

    /// The stored, unread notification this event becomes once delivered
    pub fn into_notification(self, id: Snowflake, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            recipient_id: self.recipient_id,
            sender_id: self.sender_id,
            kind: self.kind,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            is_read: false,
            created_at,
        }
    }

    pub fn post_comment(post_author: Snowflake, commenter: Snowflake, post_id: Snowflake) -> Option<Self> {
        Self::for_recipient(
            post_author,
            commenter,
            NotificationKind::PostComment,
            ResourceType::Post,
            post_id,
        )
    }
}

/// An outbox row claimed by the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    pub id: Snowflake,
    pub event: NotificationEvent,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
}
