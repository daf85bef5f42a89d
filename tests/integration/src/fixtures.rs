//! Test fixtures and data generators
//!
//! Request bodies the API accepts and the slices of its responses the tests read.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Serialize)]
pub struct CreatePostBody {
    pub title: String,
    pub content: String,
    pub category: &'static str,
}

impl CreatePostBody {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            title: format!("Trip report {suffix}"),
            content: "We crossed the river at dawn and walked the ridge until the fog lifted. ".repeat(3),
            category: "Adventure",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoteBody {
    pub kind: &'static str,
}

impl VoteBody {
    pub fn up() -> Self {
        Self { kind: "upvote" }
    }

    pub fn down() -> Self {
        Self { kind: "downvote" }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl CommentBody {
    pub fn root(content: &str) -> Self {
        Self {
            content: content.to_string(),
            parent_id: None,
        }
    }

    pub fn reply(content: &str, parent_id: &str) -> Self {
        Self {
            content: content.to_string(),
            parent_id: Some(parent_id.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlanBody {
    pub start_location: &'static str,
    pub destination: &'static str,
    pub start_date: &'static str,
    pub end_date: &'static str,
    pub min_budget: i64,
    pub max_budget: i64,
}

impl Default for TravelPlanBody {
    fn default() -> Self {
        Self {
            start_location: "Dhaka",
            destination: "Sylhet",
            start_date: "2025-03-10",
            end_date: "2025-03-13",
            min_budget: 100,
            max_budget: 300,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    pub id: String,
    pub upvote_count: i64,
    pub downvote_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    pub action: String,
    pub vote: Option<String>,
    pub upvote_count: i64,
    pub downvote_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResult {
    pub action: String,
    pub following: bool,
    pub follower_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResult {
    pub id: String,
    pub depth: i32,
    pub reply_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdOnly {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}
