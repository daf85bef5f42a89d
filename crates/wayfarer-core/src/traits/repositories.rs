//! Repository traits (ports) - read paths and writes that touch no counter
//!
//! Anything that changes an edge together with a counter goes through
//! [`StoreTx`](super::StoreTx) instead, so the two can never diverge.

use async_trait::async_trait;
use std::time::Duration;

use crate::entities::{
    Comment, Notification, Post, PostSort, TravelPlan, TravelRequest, User, Vote, VoteKind,
};
use crate::error::DomainError;
use crate::events::OutboxEntry;
use crate::value_objects::{PageRequest, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, including soft-deleted accounts
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    async fn create(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID, including soft-deleted posts
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Posts that are not deleted, in feed order
    async fn list(&self, page: PageRequest, sort: PostSort) -> RepoResult<Vec<Post>>;

    async fn count_live(&self) -> RepoResult<i64>;

    /// One author's posts that are not deleted, newest first
    async fn list_by_author(&self, author_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Post>>;

    async fn count_by_author(&self, author_id: Snowflake) -> RepoResult<i64>;

    /// Write title, content, category and premium of a live post; false if missing or deleted.
    /// Vote counters are left alone.
    async fn update_details(&self, post: &Post) -> RepoResult<bool>;

    /// Mark as deleted; returns false if it was already deleted or missing
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn find(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Vote>>;

    /// Edge count of one kind; the ground truth behind the post's counter
    async fn count_by_kind(&self, post_id: Snowflake, kind: VoteKind) -> RepoResult<i64>;
}

// ============================================================================
// Follow Repository
// ============================================================================

#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn is_following(&self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool>;

    /// Active accounts following `user_id`, newest follow first
    async fn list_followers(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<User>>;

    async fn count_followers(&self, user_id: Snowflake) -> RepoResult<i64>;

    /// Active accounts `user_id` follows, newest follow first
    async fn list_following(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<User>>;

    async fn count_following(&self, user_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Saved Post Repository
// ============================================================================

#[async_trait]
pub trait SavedPostRepository: Send + Sync {
    async fn is_saved(&self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool>;

    /// Saved posts that are not deleted, most recently saved first
    async fn list_saved_posts(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Post>>;

    async fn count_saved_posts(&self, user_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Root comments of a post, newest first
    async fn list_roots(&self, post_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Comment>>;

    async fn count_roots(&self, post_id: Snowflake) -> RepoResult<i64>;

    /// Direct replies of one comment, oldest first
    async fn list_replies(&self, parent_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Comment>>;

    /// Every direct reply of each given parent, oldest first
    async fn list_all_replies(&self, parent_ids: &[Snowflake]) -> RepoResult<Vec<Comment>>;

    /// Edge count of direct replies; the ground truth behind `reply_count`
    async fn count_replies(&self, parent_id: Snowflake) -> RepoResult<i64>;

    /// Replace the body of a live comment and flag it edited; false if missing or deleted
    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<bool>;

    /// Mark as deleted; false if missing or already deleted
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Travel Plan Repository
// ============================================================================

#[async_trait]
pub trait TravelPlanRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TravelPlan>>;

    async fn create(&self, plan: &TravelPlan) -> RepoResult<()>;
}

// ============================================================================
// Travel Request Repository
// ============================================================================

#[async_trait]
pub trait TravelRequestRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TravelRequest>>;

    /// Requests on a plan, newest first
    async fn list_for_plan(&self, plan_id: Snowflake) -> RepoResult<Vec<TravelRequest>>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert unless a row with the same ID exists; returns whether it was inserted
    async fn insert_if_absent(&self, notification: &Notification) -> RepoResult<bool>;

    /// Recipient's notifications, newest first
    async fn list_for_recipient(
        &self,
        recipient_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Vec<Notification>>;

    async fn count_for_recipient(&self, recipient_id: Snowflake) -> RepoResult<i64>;

    async fn count_unread(&self, recipient_id: Snowflake) -> RepoResult<i64>;

    /// Mark one as read; false if it does not belong to `recipient_id`
    async fn mark_read(&self, id: Snowflake, recipient_id: Snowflake) -> RepoResult<bool>;

    /// Returns how many were flipped
    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Outbox Repository
// ============================================================================

#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Lease up to `limit` undelivered entries for `lease`; leased rows are skipped by other relays
    async fn claim_batch(&self, limit: i64, lease: Duration) -> RepoResult<Vec<OutboxEntry>>;

    async fn mark_delivered(&self, id: Snowflake) -> RepoResult<()>;

    /// Count a failed attempt and release the lease.
    /// Returns true when the entry ran out of attempts and was parked as failed.
    async fn record_failure(&self, id: Snowflake, max_attempts: i32) -> RepoResult<bool>;
}
