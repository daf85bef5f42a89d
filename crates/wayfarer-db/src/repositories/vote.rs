//! PostgreSQL implementation of VoteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use wayfarer_core::entities::{Vote, VoteKind};
use wayfarer_core::traits::{RepoResult, VoteRepository};
use wayfarer_core::value_objects::Snowflake;

use crate::models::VoteModel;

use super::error::map_db_error;

/// PostgreSQL implementation of VoteRepository
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self))]
    async fn find(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Vote>> {
        let result = sqlx::query_as::<_, VoteModel>(
            r"
            SELECT post_id, user_id, kind, created_at, updated_at
            FROM post_votes
            WHERE post_id = $1 AND user_id = $2
            ",
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Vote::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn count_by_kind(&self, post_id: Snowflake, kind: VoteKind) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_votes WHERE post_id = $1 AND kind = $2")
            .bind(post_id.into_inner())
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
