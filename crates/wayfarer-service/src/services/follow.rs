//! Follow service
//!
//! Follow toggles move both users' counters with the edge. Lists only show
//! active accounts.

use tracing::{info, instrument};

use wayfarer_core::entities::{Follow, User};
use wayfarer_core::events::NotificationEvent;
use wayfarer_core::rules::FollowTransition;
use wayfarer_core::traits::StoreTx;
use wayfarer_core::{DomainError, PageRequest, Snowflake};

use crate::dto::{FollowResponse, PaginatedResponse, PublicUserResponse};

use super::context::{Actor, ServiceContext};
use super::error::ServiceResult;
use super::transaction::finish;

/// Follow service
pub struct FollowService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FollowService<'a> {
    /// Create a new FollowService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Follow `target_id`, or unfollow if already following
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn toggle_follow(&self, actor: Actor, target_id: Snowflake) -> ServiceResult<FollowResponse> {
        if actor.id == target_id {
            return Err(DomainError::CannotFollowSelf.into());
        }
        active_user(self.ctx, target_id).await?;

        let transition = self
            .ctx
            .retry_policy()
            .run("toggle_follow", || self.apply_toggle(actor.id, target_id))
            .await?;

        let target = active_user(self.ctx, target_id).await?;

        info!(
            target_id = %target_id,
            action = transition.action.as_str(),
            "Follow toggled"
        );

        Ok(FollowResponse {
            action: transition.action,
            following: transition.following,
            follower_count: target.follower_count,
            following_count: target.following_count,
        })
    }

    async fn apply_toggle(&self, follower_id: Snowflake, following_id: Snowflake) -> ServiceResult<FollowTransition> {
        let mut tx = self.ctx.store().begin().await?;
        let result = self.decide_and_write(tx.as_mut(), follower_id, following_id).await;
        finish(tx, result).await
    }

    async fn decide_and_write(
        &self,
        tx: &mut dyn StoreTx,
        follower_id: Snowflake,
        following_id: Snowflake,
    ) -> ServiceResult<FollowTransition> {
        let currently_following = tx.lock_follow(follower_id, following_id).await?;
        let transition = FollowTransition::decide(follower_id, following_id, currently_following)?;

        tx.apply_follow(&Follow::new(follower_id, following_id), transition.edge)
            .await?;
        // Fails if either account was deleted after the pre-check
        tx.apply_counter_deltas(&transition.deltas).await?;

        if transition.following {
            if let Some(event) = NotificationEvent::new_follower(following_id, follower_id) {
                tx.enqueue_notification(self.ctx.generate_id(), &event).await?;
            }
        }

        Ok(transition)
    }

    /// Accounts following `user_id`, newest first
    #[instrument(skip(self))]
    pub async fn list_followers(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<PublicUserResponse>> {
        active_user(self.ctx, user_id).await?;

        let repo = self.ctx.follow_repo();
        let users = repo.list_followers(user_id, page).await?;
        let total = repo.count_followers(user_id).await?;

        Ok(PaginatedResponse::new(
            users.iter().map(PublicUserResponse::from).collect(),
            page.meta(total),
        ))
    }

    /// Accounts `user_id` follows, newest first
    #[instrument(skip(self))]
    pub async fn list_following(
        &self,
        user_id: Snowflake,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<PublicUserResponse>> {
        active_user(self.ctx, user_id).await?;

        let repo = self.ctx.follow_repo();
        let users = repo.list_following(user_id, page).await?;
        let total = repo.count_following(user_id).await?;

        Ok(PaginatedResponse::new(
            users.iter().map(PublicUserResponse::from).collect(),
            page.meta(total),
        ))
    }
}

/// Load a user that is not soft-deleted
pub(crate) async fn active_user(ctx: &ServiceContext, user_id: Snowflake) -> ServiceResult<User> {
    ctx.user_repo()
        .find_by_id(user_id)
        .await?
        .filter(User::is_active)
        .ok_or_else(|| DomainError::UserNotFound(user_id).into())
}
