//! Comment entity - a node in a post's reply tree
//!
//! `depth` is stored on every row (root = 0) so the depth bound is checked
//! against the parent alone, without walking ancestors. `reply_count` counts
//! direct children only and is maintained by counter deltas.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub depth: i32,
    pub reply_count: i64,
    pub content: String,
    pub is_deleted: bool,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Top-level comment on a post
    pub fn new_root(id: Snowflake, post_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            post_id,
            author_id,
            parent_id: None,
            depth: 0,
            reply_count: 0,
            content,
            is_deleted: false,
            is_edited: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Direct reply to `parent`, one level deeper
    pub fn new_reply(id: Snowflake, parent: &Comment, author_id: Snowflake, content: String) -> Self {
        Self {
            parent_id: Some(parent.id),
            depth: parent.depth + 1,
            ..Self::new_root(id, parent.post_id, author_id, content)
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.is_edited = true;
        self.updated_at = Utc::now();
    }

    /// Hide the body of a soft-deleted comment; its place in the tree is kept
    pub fn redacted(mut self) -> Self {
        if self.is_deleted {
            self.content.clear();
        }
        self
    }
}
