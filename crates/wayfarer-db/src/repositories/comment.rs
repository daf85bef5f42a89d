//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use wayfarer_core::entities::Comment;
use wayfarer_core::traits::{CommentRepository, RepoResult};
use wayfarer_core::value_objects::{PageRequest, Snowflake};

use crate::models::CommentModel;

use super::error::map_db_error;

pub(crate) const COMMENT_COLUMNS: &str = "c.id, c.post_id, c.author_id, c.parent_id, c.depth, \
     c.reply_count, c.content, c.is_deleted, c.is_edited, c.created_at, c.updated_at";

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c WHERE c.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn list_roots(&self, post_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(&format!(
            r"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            WHERE c.post_id = $1 AND c.parent_id IS NULL
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(post_id.into_inner())
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_roots(&self, post_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE post_id = $1 AND parent_id IS NULL",
        )
        .bind(post_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_replies(&self, parent_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(&format!(
            r"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            WHERE c.parent_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(parent_id.into_inner())
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self), fields(parents = parent_ids.len()))]
    async fn list_all_replies(&self, parent_ids: &[Snowflake]) -> RepoResult<Vec<Comment>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = parent_ids.iter().map(|id| id.into_inner()).collect();
        let rows = sqlx::query_as::<_, CommentModel>(&format!(
            r"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            WHERE c.parent_id = ANY($1)
            ORDER BY c.parent_id, c.created_at ASC, c.id ASC
            "
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_replies(&self, parent_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE parent_id = $1")
            .bind(parent_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, content))]
    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE comments
            SET content = $2, is_edited = TRUE, updated_at = NOW()
            WHERE id = $1 AND NOT is_deleted
            ",
        )
        .bind(id.into_inner())
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE comments SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }
}
