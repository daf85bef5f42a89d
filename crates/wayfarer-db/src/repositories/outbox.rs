//! PostgreSQL implementation of OutboxRepository
//!
//! Relays lease rows with `FOR UPDATE SKIP LOCKED`, so several relays can
//! drain the same table without handing out an entry twice within a lease.

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use tracing::instrument;

use wayfarer_core::events::OutboxEntry;
use wayfarer_core::traits::{OutboxRepository, RepoResult};
use wayfarer_core::value_objects::Snowflake;

use crate::models::OutboxModel;

use super::error::map_db_error;

/// PostgreSQL implementation of OutboxRepository
#[derive(Clone)]
pub struct PgOutboxRepository {
    pool: PgPool,
}

impl PgOutboxRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutboxRepository for PgOutboxRepository {
    #[instrument(skip(self))]
    async fn claim_batch(&self, limit: i64, lease: Duration) -> RepoResult<Vec<OutboxEntry>> {
        let lease_ms = i64::try_from(lease.as_millis()).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, OutboxModel>(
            r"
            WITH claimable AS (
                SELECT id
                FROM notification_outbox
                WHERE delivered_at IS NULL
                  AND failed_at IS NULL
                  AND (locked_until IS NULL OR locked_until < NOW())
                ORDER BY created_at, id
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            UPDATE notification_outbox o
            SET locked_until = NOW() + make_interval(secs => $2::double precision / 1000.0),
                attempts = o.attempts + 1
            FROM claimable
            WHERE o.id = claimable.id
            RETURNING o.id, o.recipient_id, o.sender_id, o.kind, o.resource_type,
                      o.resource_id, o.attempts, o.created_at
            ",
        )
        .bind(limit)
        .bind(lease_ms)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut entries = rows
            .into_iter()
            .map(OutboxEntry::try_from)
            .collect::<RepoResult<Vec<_>>>()?;
        entries.sort_by_key(|entry| (entry.created_at, entry.id));
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn mark_delivered(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            "UPDATE notification_outbox SET delivered_at = NOW(), locked_until = NULL WHERE id = $1",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_failure(&self, id: Snowflake, max_attempts: i32) -> RepoResult<bool> {
        let parked = sqlx::query_scalar::<_, bool>(
            r"
            UPDATE notification_outbox
            SET locked_until = NULL,
                failed_at = CASE WHEN attempts >= $2 THEN NOW() ELSE NULL END
            WHERE id = $1
            RETURNING failed_at IS NOT NULL
            ",
        )
        .bind(id.into_inner())
        .bind(max_attempts)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(parked.unwrap_or(false))
    }
}
