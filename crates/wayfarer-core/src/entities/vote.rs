//! Vote edge - one user's vote on one post

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{CounterField, Snowflake};

/// The two mutually exclusive vote kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Upvote,
    Downvote,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upvote" => Some(Self::Upvote),
            "downvote" => Some(Self::Downvote),
            _ => None,
        }
    }

    /// Post counter that tracks edges of this kind
    pub const fn counter(self) -> CounterField {
        match self {
            Self::Upvote => CounterField::PostUpvotes,
            Self::Downvote => CounterField::PostDownvotes,
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vote edge; `(post_id, user_id)` is unique
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub post_id: Snowflake,
    pub user_id: Snowflake,
    pub kind: VoteKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(post_id: Snowflake, user_id: Snowflake, kind: VoteKind) -> Self {
        let now = Utc::now();
        Self {
            post_id,
            user_id,
            kind,
            created_at: now,
            updated_at: now,
        }
    }
}
