//! Vote service
//!
//! Toggles a user's vote on a post. The edge and the post's counters change in
//! one transaction; the whole read-decide-write sequence is retried on conflict.

use tracing::{info, instrument};

use wayfarer_core::entities::{Post, Vote, VoteKind};
use wayfarer_core::events::NotificationEvent;
use wayfarer_core::rules::VoteTransition;
use wayfarer_core::traits::StoreTx;
use wayfarer_core::{DomainError, Snowflake};

use crate::dto::{VoteResponse, VoteStatusResponse};

use super::context::{Actor, ServiceContext};
use super::error::ServiceResult;
use super::transaction::finish;

/// Vote service
pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    /// Create a new VoteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Toggle `kind` on a post: add it, remove it, or switch from the other kind.
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn toggle_vote(
        &self,
        actor: Actor,
        post_id: Snowflake,
        kind: VoteKind,
    ) -> ServiceResult<VoteResponse> {
        let post = live_post(self.ctx, post_id).await?;

        let transition = self
            .ctx
            .retry_policy()
            .run("toggle_vote", || self.apply_toggle(actor, &post, kind))
            .await?;

        // Counters as committed, including concurrent voters
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        info!(
            post_id = %post_id,
            action = transition.action.as_str(),
            "Vote toggled"
        );

        Ok(VoteResponse {
            action: transition.action,
            vote: transition.resulting,
            upvote_count: post.upvote_count,
            downvote_count: post.downvote_count,
        })
    }

    async fn apply_toggle(&self, actor: Actor, post: &Post, kind: VoteKind) -> ServiceResult<VoteTransition> {
        let mut tx = self.ctx.store().begin().await?;
        let result = self.decide_and_write(tx.as_mut(), actor, post, kind).await;
        finish(tx, result).await
    }

    async fn decide_and_write(
        &self,
        tx: &mut dyn StoreTx,
        actor: Actor,
        post: &Post,
        kind: VoteKind,
    ) -> ServiceResult<VoteTransition> {
        let existing = tx.lock_vote(post.id, actor.id).await?;
        let transition = VoteTransition::decide(post.id, existing, kind);

        let vote = Vote::new(post.id, actor.id, kind);
        tx.apply_vote(&vote, transition.edge).await?;
        tx.apply_counter_deltas(&transition.deltas).await?;

        if transition.notifies_author() {
            if let Some(event) = NotificationEvent::post_upvote(post.author_id, actor.id, post.id) {
                tx.enqueue_notification(self.ctx.generate_id(), &event).await?;
            }
        }

        Ok(transition)
    }

    /// Whether the actor currently votes on a post, and how
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn vote_status(&self, actor: Actor, post_id: Snowflake) -> ServiceResult<VoteStatusResponse> {
        live_post(self.ctx, post_id).await?;

        let vote = self.ctx.vote_repo().find(post_id, actor.id).await?;

        Ok(VoteStatusResponse {
            has_voted: vote.is_some(),
            kind: vote.map(|v| v.kind),
        })
    }
}

/// Load a post that is not soft-deleted
pub(crate) async fn live_post(ctx: &ServiceContext, post_id: Snowflake) -> ServiceResult<Post> {
    ctx.post_repo()
        .find_by_id(post_id)
        .await?
        .filter(|post| !post.is_deleted)
        .ok_or_else(|| DomainError::PostNotFound(post_id).into())
}
