//! Post entity - a travel story that carries vote counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PostCategory {
    Adventure,
    #[serde(rename = "Business Travel")]
    BusinessTravel,
    Exploration,
    #[default]
    Other,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adventure => "Adventure",
            Self::BusinessTravel => "Business Travel",
            Self::Exploration => "Exploration",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Adventure" => Some(Self::Adventure),
            "Business Travel" => Some(Self::BusinessTravel),
            "Exploration" => Some(Self::Exploration),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Feed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    /// Newest first
    #[default]
    Latest,
    /// Most upvotes first, newest first among ties
    Popular,
}

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    pub premium: bool,
    pub upvote_count: i64,
    pub downvote_count: i64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        id: Snowflake,
        author_id: Snowflake,
        title: String,
        content: String,
        category: PostCategory,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            title,
            content,
            category,
            premium: false,
            upvote_count: 0,
            downvote_count: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Apply the given fields of an author edit; counters are never touched
    pub fn apply_edit(
        &mut self,
        title: Option<String>,
        content: Option<String>,
        category: Option<PostCategory>,
        premium: Option<bool>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(premium) = premium {
            self.premium = premium;
        }
        self.updated_at = Utc::now();
    }

    /// Upvotes minus downvotes
    #[inline]
    pub fn score(&self) -> i64 {
        self.upvote_count - self.downvote_count
    }
}
