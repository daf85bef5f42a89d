//! Notification service
//!
//! The recipient's inbox. Rows are written by the outbox relay, never here.

use tracing::{info, instrument};

use wayfarer_core::{DomainError, PageRequest, Snowflake};

use crate::dto::{MarkAllReadResponse, NotificationListResponse, NotificationResponse};

use super::context::{Actor, ServiceContext};
use super::error::ServiceResult;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The actor's notifications, newest first, with their unread total
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn list(&self, actor: Actor, page: PageRequest) -> ServiceResult<NotificationListResponse> {
        let repo = self.ctx.notification_repo();
        let notifications = repo.list_for_recipient(actor.id, page).await?;
        let total = repo.count_for_recipient(actor.id).await?;
        let unread_count = repo.count_unread(actor.id).await?;

        Ok(NotificationListResponse {
            data: notifications.iter().map(NotificationResponse::from).collect(),
            meta: page.meta(total),
            unread_count,
        })
    }

    /// Mark one of the actor's own notifications read
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn mark_read(&self, actor: Actor, notification_id: Snowflake) -> ServiceResult<()> {
        if !self
            .ctx
            .notification_repo()
            .mark_read(notification_id, actor.id)
            .await?
        {
            return Err(DomainError::NotificationNotFound(notification_id).into());
        }
        Ok(())
    }

    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn mark_all_read(&self, actor: Actor) -> ServiceResult<MarkAllReadResponse> {
        let updated = self.ctx.notification_repo().mark_all_read(actor.id).await?;
        info!(updated, "Notifications marked read");
        Ok(MarkAllReadResponse { updated })
    }
}
