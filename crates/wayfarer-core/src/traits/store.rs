//! Transactional store - the only place edges and counters change together
//!
//! A service opens a [`StoreTx`], reads the current edge state through it,
//! asks a rule what to do, applies the edge mutation, the counter deltas, and
//! the outbox entry through the same transaction, and commits. Dropping a
//! transaction without committing rolls it back.

use async_trait::async_trait;

use crate::entities::{Comment, Follow, Notification, SavedPost, TravelRequest, TravelRequestStatus, Vote, VoteKind};
use crate::events::NotificationEvent;
use crate::rules::EdgeMutation;
use crate::value_objects::{CounterDelta, Snowflake};

use super::RepoResult;

#[async_trait]
pub trait TransactionalStore: Send + Sync {
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>>;
}

/// One open transaction.
///
/// Edge mutations are conditional on the state carried by [`EdgeMutation`]: an
/// insert over an existing edge, or an update/delete that finds a different
/// state, fails with `DomainError::TransactionConflict`.
#[async_trait]
pub trait StoreTx: Send {
    // ---- votes ----

    /// Current vote of `user_id` on `post_id`, locking the edge for this transaction
    async fn lock_vote(&mut self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<VoteKind>>;

    async fn apply_vote(&mut self, vote: &Vote, mutation: EdgeMutation<VoteKind>) -> RepoResult<()>;

    // ---- follows ----

    async fn lock_follow(&mut self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool>;

    async fn apply_follow(&mut self, follow: &Follow, mutation: EdgeMutation) -> RepoResult<()>;

    // ---- saved posts ----

    async fn lock_saved(&mut self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool>;

    async fn apply_saved(&mut self, saved: &SavedPost, mutation: EdgeMutation) -> RepoResult<()>;

    // ---- comments ----

    /// Read a comment inside the transaction and lock it for the reply-count update that follows.
    /// Concurrent repliers to the same parent queue here.
    async fn find_comment(&mut self, id: Snowflake) -> RepoResult<Option<Comment>>;

    async fn insert_comment(&mut self, comment: &Comment) -> RepoResult<()>;

    // ---- travel requests ----

    /// Fails with `AlreadyRequested` if the requester already asked for this plan
    async fn insert_travel_request(&mut self, request: &TravelRequest) -> RepoResult<()>;

    /// Move a request from `from` to `to`; false if it was no longer in `from`
    async fn transition_travel_request(
        &mut self,
        id: Snowflake,
        from: TravelRequestStatus,
        to: TravelRequestStatus,
    ) -> RepoResult<bool>;

    // ---- counters and outbox ----

    /// Apply each delta as an atomic in-place increment.
    /// A delta whose document no longer exists fails the whole transaction.
    async fn apply_counter_deltas(&mut self, deltas: &[CounterDelta]) -> RepoResult<()>;

    /// Queue a notification for delivery once this transaction commits
    async fn enqueue_notification(&mut self, id: Snowflake, event: &NotificationEvent) -> RepoResult<()>;

    async fn commit(self: Box<Self>) -> RepoResult<()>;

    async fn rollback(self: Box<Self>) -> RepoResult<()>;
}

/// Where delivered notifications are pushed for live clients
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification) -> RepoResult<()>;
}
