//! PostgreSQL transactional store
//!
//! Runs at READ COMMITTED. Existing edges are locked with `FOR UPDATE` before a
//! rule decides what to do; a racing insert of a missing edge trips the primary
//! key and surfaces as `TransactionConflict`, which the service retries.
//!
//! Parent rows are only ever locked in modes that conflict with each other
//! (`FOR NO KEY UPDATE` and the counter `UPDATE`), and counter rows are updated
//! in `CounterDelta::merge` order. Writers on the same parent queue instead of
//! deadlocking.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use wayfarer_core::entities::{
    Comment, Follow, SavedPost, TravelRequest, TravelRequestStatus, Vote, VoteKind,
};
use wayfarer_core::error::DomainError;
use wayfarer_core::events::NotificationEvent;
use wayfarer_core::rules::EdgeMutation;
use wayfarer_core::traits::{RepoResult, StoreTx, TransactionalStore};
use wayfarer_core::value_objects::{CounterDelta, CounterField, Snowflake};

use crate::models::CommentModel;

use super::comment::COMMENT_COLUMNS;
use super::error::{
    expect_one_row, map_db_error, map_edge_insert, map_missing_actor,
};

/// Opens [`PgStoreTx`] transactions on a pool
#[derive(Clone)]
pub struct PgTransactionalStore {
    pool: PgPool,
}

impl PgTransactionalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionalStore for PgTransactionalStore {
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgStoreTx { tx }))
    }
}

/// One open PostgreSQL transaction
pub struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

/// Error for a counter whose document vanished (or was soft-deleted) mid-transaction
fn missing_document(delta: &CounterDelta) -> DomainError {
    match delta.field {
        CounterField::PostUpvotes | CounterField::PostDownvotes => {
            DomainError::PostNotFound(delta.document)
        }
        CounterField::UserFollowers | CounterField::UserFollowing => {
            DomainError::UserNotFound(delta.document)
        }
        CounterField::CommentReplies => DomainError::CommentNotFound(delta.document),
    }
}

#[async_trait]
impl StoreTx for PgStoreTx {
    #[instrument(skip(self))]
    async fn lock_vote(&mut self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<VoteKind>> {
        let kind = sqlx::query_scalar::<_, String>(
            "SELECT kind FROM post_votes WHERE post_id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        kind.map(|k| {
            VoteKind::parse(&k)
                .ok_or_else(|| DomainError::DatabaseError(format!("unexpected kind value: {k}")))
        })
        .transpose()
    }

    #[instrument(skip(self, vote), fields(post_id = %vote.post_id, user_id = %vote.user_id))]
    async fn apply_vote(&mut self, vote: &Vote, mutation: EdgeMutation<VoteKind>) -> RepoResult<()> {
        let post_id = vote.post_id.into_inner();
        let user_id = vote.user_id.into_inner();

        let rows = match mutation {
            EdgeMutation::Insert(kind) => sqlx::query(
                r"
                INSERT INTO post_votes (post_id, user_id, kind, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(post_id)
            .bind(user_id)
            .bind(kind.as_str())
            .bind(vote.created_at)
            .bind(vote.updated_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_edge_insert(e, vote.user_id, || DomainError::TransactionConflict))?,
            EdgeMutation::Update { from, to } => sqlx::query(
                r"
                UPDATE post_votes SET kind = $4, updated_at = NOW()
                WHERE post_id = $1 AND user_id = $2 AND kind = $3
                ",
            )
            .bind(post_id)
            .bind(user_id)
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?,
            EdgeMutation::Delete(kind) => sqlx::query(
                "DELETE FROM post_votes WHERE post_id = $1 AND user_id = $2 AND kind = $3",
            )
            .bind(post_id)
            .bind(user_id)
            .bind(kind.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?,
        };

        expect_one_row(rows.rows_affected())
    }

    #[instrument(skip(self))]
    async fn lock_follow(&mut self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool> {
        let row = sqlx::query_scalar::<_, i64>(
            r"
            SELECT follower_id FROM user_follows
            WHERE follower_id = $1 AND following_id = $2
            FOR UPDATE
            ",
        )
        .bind(follower_id.into_inner())
        .bind(following_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(row.is_some())
    }

    #[instrument(skip(self, follow), fields(follower_id = %follow.follower_id, following_id = %follow.following_id))]
    async fn apply_follow(&mut self, follow: &Follow, mutation: EdgeMutation) -> RepoResult<()> {
        let rows = match mutation {
            EdgeMutation::Insert(()) => sqlx::query(
                "INSERT INTO user_follows (follower_id, following_id, created_at) VALUES ($1, $2, $3)",
            )
            .bind(follow.follower_id.into_inner())
            .bind(follow.following_id.into_inner())
            .bind(follow.created_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_edge_insert(e, follow.follower_id, || DomainError::TransactionConflict))?,
            EdgeMutation::Delete(()) => sqlx::query(
                "DELETE FROM user_follows WHERE follower_id = $1 AND following_id = $2",
            )
            .bind(follow.follower_id.into_inner())
            .bind(follow.following_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?,
            EdgeMutation::Update { .. } => {
                return Err(DomainError::InternalError(
                    "follow edges carry no state to update".to_string(),
                ))
            }
        };

        expect_one_row(rows.rows_affected())
    }

    #[instrument(skip(self))]
    async fn lock_saved(&mut self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool> {
        let row = sqlx::query_scalar::<_, i64>(
            "SELECT post_id FROM saved_posts WHERE user_id = $1 AND post_id = $2 FOR UPDATE",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(row.is_some())
    }

    #[instrument(skip(self, saved), fields(user_id = %saved.user_id, post_id = %saved.post_id))]
    async fn apply_saved(&mut self, saved: &SavedPost, mutation: EdgeMutation) -> RepoResult<()> {
        let rows = match mutation {
            EdgeMutation::Insert(()) => sqlx::query(
                "INSERT INTO saved_posts (user_id, post_id, created_at) VALUES ($1, $2, $3)",
            )
            .bind(saved.user_id.into_inner())
            .bind(saved.post_id.into_inner())
            .bind(saved.created_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_edge_insert(e, saved.user_id, || DomainError::TransactionConflict))?,
            EdgeMutation::Delete(()) => sqlx::query(
                "DELETE FROM saved_posts WHERE user_id = $1 AND post_id = $2",
            )
            .bind(saved.user_id.into_inner())
            .bind(saved.post_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?,
            EdgeMutation::Update { .. } => {
                return Err(DomainError::InternalError(
                    "saved-post edges carry no state to update".to_string(),
                ))
            }
        };

        expect_one_row(rows.rows_affected())
    }

    #[instrument(skip(self))]
    async fn find_comment(&mut self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c WHERE c.id = $1 FOR NO KEY UPDATE"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn insert_comment(&mut self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO comments (id, post_id, author_id, parent_id, depth, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.post_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(comment.parent_id.map(Snowflake::into_inner))
        .bind(comment.depth)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_missing_actor(e, comment.author_id))?;

        Ok(())
    }

    #[instrument(skip(self, request), fields(request_id = %request.id))]
    async fn insert_travel_request(&mut self, request: &TravelRequest) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO travel_requests (id, plan_id, requester_id, note, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(request.id.into_inner())
        .bind(request.plan_id.into_inner())
        .bind(request.requester_id.into_inner())
        .bind(request.note.as_deref())
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_edge_insert(e, request.requester_id, || DomainError::AlreadyRequested))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn transition_travel_request(
        &mut self,
        id: Snowflake,
        from: TravelRequestStatus,
        to: TravelRequestStatus,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE travel_requests SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
        )
        .bind(id.into_inner())
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, deltas), fields(count = deltas.len()))]
    async fn apply_counter_deltas(&mut self, deltas: &[CounterDelta]) -> RepoResult<()> {
        for delta in CounterDelta::merge(deltas) {
            // Table and column come from the closed CounterField mapping, never from input.
            let (table, column) = delta.field.column();
            let sql = format!(
                "UPDATE {table} SET {column} = {column} + $2 WHERE id = $1 AND NOT is_deleted"
            );

            let result = sqlx::query(&sql)
                .bind(delta.document.into_inner())
                .bind(i64::from(delta.delta))
                .execute(&mut *self.tx)
                .await
                .map_err(map_db_error)?;

            if result.rows_affected() != 1 {
                return Err(missing_document(&delta));
            }
        }

        Ok(())
    }

    #[instrument(skip(self, event), fields(recipient_id = %event.recipient_id, kind = event.kind.as_str()))]
    async fn enqueue_notification(&mut self, id: Snowflake, event: &NotificationEvent) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO notification_outbox (id, recipient_id, sender_id, kind, resource_type, resource_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id.into_inner())
        .bind(event.recipient_id.into_inner())
        .bind(event.sender_id.into_inner())
        .bind(event.kind.as_str())
        .bind(event.resource_type.as_str())
        .bind(event.resource_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        self.tx.rollback().await.map_err(map_db_error)
    }
}
