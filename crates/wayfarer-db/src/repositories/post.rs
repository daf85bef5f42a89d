//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use wayfarer_core::entities::{Post, PostSort};
use wayfarer_core::traits::{PostRepository, RepoResult};
use wayfarer_core::value_objects::{PageRequest, Snowflake};

use crate::models::PostModel;

use super::error::{map_db_error, map_missing_actor};

pub(crate) const POST_COLUMNS: &str = "p.id, p.author_id, p.title, p.content, p.category, p.premium, \
     p.upvote_count, p.downvote_count, p.is_deleted, p.created_at, p.updated_at";

/// Feed `ORDER BY`; the id breaks ties so pages never overlap
fn order_clause(sort: PostSort) -> &'static str {
    match sort {
        PostSort::Latest => "p.created_at DESC, p.id DESC",
        PostSort::Popular => "p.upvote_count DESC, p.created_at DESC, p.id DESC",
    }
}

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, author_id, title, content, category, premium, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(post.id.into_inner())
        .bind(post.author_id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.category.as_str())
        .bind(post.premium)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_missing_actor(e, post.author_id))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, page: PageRequest, sort: PostSort) -> RepoResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE NOT p.is_deleted ORDER BY {} LIMIT $1 OFFSET $2",
            order_clause(sort)
        ))
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_live(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE NOT is_deleted")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_by_author(&self, author_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostModel>(&format!(
            r"
            SELECT {POST_COLUMNS}
            FROM posts p
            WHERE p.author_id = $1 AND NOT p.is_deleted
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(author_id.into_inner())
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_author(&self, author_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts WHERE author_id = $1 AND NOT is_deleted",
        )
        .bind(author_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update_details(&self, post: &Post) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET title = $2, content = $3, category = $4, premium = $5, updated_at = $6
            WHERE id = $1 AND NOT is_deleted
            ",
        )
        .bind(post.id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.category.as_str())
        .bind(post.premium)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE posts SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }
}
