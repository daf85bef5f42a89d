//! PostgreSQL implementation of SavedPostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use wayfarer_core::entities::Post;
use wayfarer_core::traits::{RepoResult, SavedPostRepository};
use wayfarer_core::value_objects::{PageRequest, Snowflake};

use crate::models::PostModel;

use super::error::map_db_error;
use super::post::POST_COLUMNS;

/// PostgreSQL implementation of SavedPostRepository
#[derive(Clone)]
pub struct PgSavedPostRepository {
    pool: PgPool,
}

impl PgSavedPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedPostRepository for PgSavedPostRepository {
    #[instrument(skip(self))]
    async fn is_saved(&self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM saved_posts WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_saved_posts(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostModel>(&format!(
            r"
            SELECT {POST_COLUMNS}
            FROM saved_posts s
            JOIN posts p ON p.id = s.post_id
            WHERE s.user_id = $1 AND NOT p.is_deleted
            ORDER BY s.created_at DESC, s.post_id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(user_id.into_inner())
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_saved_posts(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM saved_posts s
            JOIN posts p ON p.id = s.post_id
            WHERE s.user_id = $1 AND NOT p.is_deleted
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
