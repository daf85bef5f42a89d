//! Notification entity - an inbox item produced by the outbox relay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TravelRequest,
    RequestAccepted,
    RequestRejected,
    PostComment,
    PostUpvote,
    NewFollower,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TravelRequest => "travel_request",
            Self::RequestAccepted => "request_accepted",
            Self::RequestRejected => "request_rejected",
            Self::PostComment => "post_comment",
            Self::PostUpvote => "post_upvote",
            Self::NewFollower => "new_follower",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "travel_request" => Some(Self::TravelRequest),
            "request_accepted" => Some(Self::RequestAccepted),
            "request_rejected" => Some(Self::RequestRejected),
            "post_comment" => Some(Self::PostComment),
            "post_upvote" => Some(Self::PostUpvote),
            "new_follower" => Some(Self::NewFollower),
            _ => None,
        }
    }
}

/// What it happened to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    User,
    Post,
    Comment,
    TravelPlan,
    TravelRequest,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Post => "Post",
            Self::Comment => "Comment",
            Self::TravelPlan => "TravelPlan",
            Self::TravelRequest => "TravelRequest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "User" => Some(Self::User),
            "Post" => Some(Self::Post),
            "Comment" => Some(Self::Comment),
            "TravelPlan" => Some(Self::TravelPlan),
            "TravelRequest" => Some(Self::TravelRequest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub recipient_id: Snowflake,
    pub sender_id: Snowflake,
    pub kind: NotificationKind,
    pub resource_type: ResourceType,
    pub resource_id: Snowflake,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
