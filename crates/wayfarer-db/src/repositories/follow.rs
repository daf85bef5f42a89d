//! PostgreSQL implementation of FollowRepository
//!
//! Lists join `users` and skip soft-deleted accounts; the edges themselves stay.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use wayfarer_core::entities::User;
use wayfarer_core::traits::{FollowRepository, RepoResult};
use wayfarer_core::value_objects::{PageRequest, Snowflake};

use crate::models::UserModel;

use super::error::map_db_error;
use super::user::USER_COLUMNS;

/// PostgreSQL implementation of FollowRepository
#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    #[instrument(skip(self))]
    async fn is_following(&self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_follows WHERE follower_id = $1 AND following_id = $2)",
        )
        .bind(follower_id.into_inner())
        .bind(following_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_followers(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM user_follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = $1 AND NOT u.is_deleted
            ORDER BY f.created_at DESC, f.follower_id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(user_id.into_inner())
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_followers(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM user_follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = $1 AND NOT u.is_deleted
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_following(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM user_follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = $1 AND NOT u.is_deleted
            ORDER BY f.created_at DESC, f.following_id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(user_id.into_inner())
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_following(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM user_follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = $1 AND NOT u.is_deleted
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
