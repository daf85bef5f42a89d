//! Reply-tree rules: depth bound, content bounds, and the listing preview decision

use crate::entities::Comment;
use crate::error::DomainError;
use crate::value_objects::{CounterDelta, CounterField, Snowflake};

/// Whether a root's replies are inlined into a comment listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPreview {
    /// Attach every direct reply, oldest first
    Inline,
    /// Attach none; the client pages through them separately
    Deferred,
}

impl ReplyPreview {
    #[inline]
    pub fn has_more_replies(self) -> bool {
        self == Self::Deferred
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRules {
    /// Deepest allowed comment; roots are depth 0
    pub max_depth: i32,
    /// Roots with at most this many replies get them inlined
    pub preview_limit: i64,
}

impl ThreadRules {
    pub const DEFAULT_MAX_DEPTH: i32 = 2;
    pub const DEFAULT_PREVIEW_LIMIT: i64 = 3;
    pub const MAX_CONTENT_LENGTH: usize = 2000;

    pub fn new(max_depth: i32, preview_limit: i64) -> Self {
        Self {
            max_depth: max_depth.max(0),
            preview_limit: preview_limit.max(0),
        }
    }

    /// Trim and bound comment text
    pub fn normalize_content(&self, raw: &str) -> Result<String, DomainError> {
        let content = raw.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        if content.chars().count() > Self::MAX_CONTENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: Self::MAX_CONTENT_LENGTH,
            });
        }
        Ok(content.to_string())
    }

    /// Check that `parent` can take a new reply on `post_id`.
    ///
    /// A deleted parent, or one from another post, is treated as missing.
    pub fn check_reply(&self, parent: &Comment, post_id: Snowflake) -> Result<(), DomainError> {
        if parent.is_deleted || parent.post_id != post_id {
            return Err(DomainError::ParentCommentNotFound(parent.id));
        }
        if parent.depth >= self.max_depth {
            return Err(DomainError::DepthExceeded {
                max: self.max_depth,
            });
        }
        Ok(())
    }

    /// Counter change that accompanies inserting a reply under `parent_id`
    pub fn reply_deltas(parent_id: Snowflake) -> Vec<CounterDelta> {
        vec![CounterDelta::increment(parent_id, CounterField::CommentReplies)]
    }

    /// `reply_count <= preview_limit` inlines all replies; above it inlines none
    pub fn preview(&self, root: &Comment) -> ReplyPreview {
        if root.reply_count <= self.preview_limit {
            ReplyPreview::Inline
        } else {
            ReplyPreview::Deferred
        }
    }
}

impl Default for ThreadRules {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DEPTH, Self::DEFAULT_PREVIEW_LIMIT)
    }
}
