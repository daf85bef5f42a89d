//! Outbox relay
//!
//! Background task that turns committed outbox rows into inbox notifications
//! and pushes them to live clients. Delivery is at-least-once: the inbox row
//! reuses the outbox id, so a redelivered entry is a no-op insert.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use wayfarer_common::OutboxConfig;
use wayfarer_core::events::OutboxEntry;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Outbox relay
pub struct NotificationRelay {
    ctx: ServiceContext,
    poll_interval: Duration,
    batch_size: i64,
    max_attempts: i32,
    lease: Duration,
}

impl NotificationRelay {
    pub fn new(ctx: ServiceContext, config: &OutboxConfig) -> Self {
        Self {
            ctx,
            poll_interval: config.poll_interval(),
            batch_size: config.batch_size.max(1),
            max_attempts: config.max_attempts.max(1),
            lease: config.lease(),
        }
    }

    /// Poll until `shutdown` flips to true. A full batch is followed immediately by the next one.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            batch_size = self.batch_size,
            "Notification relay started"
        );

        loop {
            let claimed = match self.relay_batch().await {
                Ok(count) => count,
                Err(e) => {
                    warn!(error = %e, "Outbox claim failed");
                    0
                }
            };

            if claimed as i64 >= self.batch_size {
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Notification relay stopped");
    }

    /// Claim one batch and deliver it; returns how many entries were claimed
    #[instrument(skip(self))]
    pub async fn relay_batch(&self) -> ServiceResult<usize> {
        let entries = self
            .ctx
            .outbox_repo()
            .claim_batch(self.batch_size, self.lease)
            .await?;

        if entries.is_empty() {
            return Ok(0);
        }
        debug!(claimed = entries.len(), "Relaying outbox entries");

        let claimed = entries.len();
        for entry in entries {
            self.deliver(entry).await;
        }
        Ok(claimed)
    }

    async fn deliver(&self, entry: OutboxEntry) {
        let id = entry.id;

        let Err(e) = self.persist(entry).await else {
            return;
        };

        match self.ctx.outbox_repo().record_failure(id, self.max_attempts).await {
            Ok(true) => error!(outbox_id = %id, error = %e, "Notification delivery abandoned"),
            Ok(false) => warn!(outbox_id = %id, error = %e, "Notification delivery failed, will retry"),
            Err(record_err) => warn!(
                outbox_id = %id,
                error = %record_err,
                "Could not record delivery failure; lease will expire"
            ),
        }
    }

    async fn persist(&self, entry: OutboxEntry) -> ServiceResult<()> {
        let notification = entry.event.into_notification(entry.id, Utc::now());

        let inserted = self
            .ctx
            .notification_repo()
            .insert_if_absent(&notification)
            .await?;

        // Live push is best effort; the inbox row is the source of truth
        if inserted {
            if let Err(e) = self.ctx.sink().notify(&notification).await {
                warn!(
                    notification_id = %notification.id,
                    recipient_id = %notification.recipient_id,
                    error = %e,
                    "Live notification push failed"
                );
            }
        }

        self.ctx.outbox_repo().mark_delivered(entry.id).await?;
        Ok(())
    }
}
