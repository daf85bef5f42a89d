//! Saved post service

use tracing::{info, instrument};

use wayfarer_core::entities::SavedPost;
use wayfarer_core::rules::{toggle_presence, ToggleAction};
use wayfarer_core::traits::StoreTx;
use wayfarer_core::{PageRequest, Snowflake};

use crate::dto::{PaginatedResponse, PostResponse, SaveResponse};

use super::context::{Actor, ServiceContext};
use super::error::ServiceResult;
use super::transaction::finish;
use super::vote::live_post;

/// Saved post service
pub struct SavedPostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SavedPostService<'a> {
    /// Create a new SavedPostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Save a post, or unsave it if already saved. No counter is kept.
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn toggle_save(&self, actor: Actor, post_id: Snowflake) -> ServiceResult<SaveResponse> {
        live_post(self.ctx, post_id).await?;

        let action = self
            .ctx
            .retry_policy()
            .run("toggle_save", || self.apply_toggle(actor.id, post_id))
            .await?;

        info!(post_id = %post_id, action = action.as_str(), "Save toggled");

        Ok(SaveResponse {
            action,
            saved: action == ToggleAction::Added,
        })
    }

    async fn apply_toggle(&self, user_id: Snowflake, post_id: Snowflake) -> ServiceResult<ToggleAction> {
        let mut tx = self.ctx.store().begin().await?;
        let result = Self::decide_and_write(tx.as_mut(), user_id, post_id).await;
        finish(tx, result).await
    }

    async fn decide_and_write(
        tx: &mut dyn StoreTx,
        user_id: Snowflake,
        post_id: Snowflake,
    ) -> ServiceResult<ToggleAction> {
        let saved = tx.lock_saved(user_id, post_id).await?;
        let (action, edge) = toggle_presence(saved);
        tx.apply_saved(&SavedPost::new(user_id, post_id), edge).await?;
        Ok(action)
    }

    /// The actor's saved posts, most recently saved first
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn list_saved(
        &self,
        actor: Actor,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<PostResponse>> {
        let repo = self.ctx.saved_post_repo();
        let posts = repo.list_saved_posts(actor.id, page).await?;
        let total = repo.count_saved_posts(actor.id).await?;

        Ok(PaginatedResponse::new(
            posts.iter().map(PostResponse::from).collect(),
            page.meta(total),
        ))
    }
}
