//! Comment service
//!
//! Threaded comments: a reply is only accepted below the depth bound, and its
//! parent's `reply_count` moves in the same transaction as the insert.
//! Listings page through roots and inline small reply sets.

use std::collections::HashMap;

use tracing::{info, instrument};

use wayfarer_core::entities::{Comment, Post};
use wayfarer_core::events::NotificationEvent;
use wayfarer_core::rules::{AccessPolicy, ThreadRules};
use wayfarer_core::traits::StoreTx;
use wayfarer_core::{Capabilities, DomainError, PageRequest, Snowflake};

use crate::dto::{CommentResponse, CommentThreadResponse, PaginatedResponse};

use super::context::{Actor, ServiceContext};
use super::error::ServiceResult;
use super::transaction::finish;
use super::vote::live_post;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Comment on a post, or reply to `parent_id`
    #[instrument(skip(self, content), fields(actor_id = %actor.id))]
    pub async fn create_comment(
        &self,
        actor: Actor,
        post_id: Snowflake,
        content: &str,
        parent_id: Option<Snowflake>,
    ) -> ServiceResult<CommentResponse> {
        let rules = self.ctx.thread_rules();
        let content = rules.normalize_content(content)?;
        let post = live_post(self.ctx, post_id).await?;

        let comment = self
            .ctx
            .retry_policy()
            .run("create_comment", || {
                self.insert_comment(actor, &post, parent_id, content.clone())
            })
            .await?;

        info!(
            comment_id = %comment.id,
            post_id = %post_id,
            depth = comment.depth,
            "Comment created"
        );

        Ok(CommentResponse::from(comment))
    }

    async fn insert_comment(
        &self,
        actor: Actor,
        post: &Post,
        parent_id: Option<Snowflake>,
        content: String,
    ) -> ServiceResult<Comment> {
        let mut tx = self.ctx.store().begin().await?;
        let result = self
            .write_comment(tx.as_mut(), actor, post, parent_id, content)
            .await;
        finish(tx, result).await
    }

    async fn write_comment(
        &self,
        tx: &mut dyn StoreTx,
        actor: Actor,
        post: &Post,
        parent_id: Option<Snowflake>,
        content: String,
    ) -> ServiceResult<Comment> {
        let id = self.ctx.generate_id();

        let comment = match parent_id {
            Some(parent_id) => {
                let parent = tx
                    .find_comment(parent_id)
                    .await?
                    .ok_or(DomainError::ParentCommentNotFound(parent_id))?;
                self.ctx.thread_rules().check_reply(&parent, post.id)?;

                let reply = Comment::new_reply(id, &parent, actor.id, content);
                tx.insert_comment(&reply).await?;
                tx.apply_counter_deltas(&ThreadRules::reply_deltas(parent.id))
                    .await?;
                reply
            }
            None => {
                let root = Comment::new_root(id, post.id, actor.id, content);
                tx.insert_comment(&root).await?;
                root
            }
        };

        if let Some(event) = NotificationEvent::post_comment(post.author_id, actor.id, post.id) {
            tx.enqueue_notification(self.ctx.generate_id(), &event).await?;
        }

        Ok(comment)
    }

    /// Root comments of a post, newest first, each with its reply preview
    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        post_id: Snowflake,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<CommentThreadResponse>> {
        live_post(self.ctx, post_id).await?;

        let repo = self.ctx.comment_repo();
        let rules = self.ctx.thread_rules();

        let roots = repo.list_roots(post_id, page).await?;
        let total = repo.count_roots(post_id).await?;

        let inline_ids: Vec<Snowflake> = roots
            .iter()
            .filter(|root| root.reply_count > 0 && !rules.preview(root).has_more_replies())
            .map(|root| root.id)
            .collect();

        let mut replies_by_parent: HashMap<Snowflake, Vec<CommentResponse>> = HashMap::new();
        for reply in repo.list_all_replies(&inline_ids).await? {
            if let Some(parent_id) = reply.parent_id {
                replies_by_parent
                    .entry(parent_id)
                    .or_default()
                    .push(CommentResponse::from(reply));
            }
        }

        let threads = roots
            .into_iter()
            .map(|root| {
                let has_more_replies = rules.preview(&root).has_more_replies();
                let replies = replies_by_parent.remove(&root.id).unwrap_or_default();
                CommentThreadResponse {
                    comment: CommentResponse::from(root),
                    replies,
                    has_more_replies,
                }
            })
            .collect();

        Ok(PaginatedResponse::new(threads, page.meta(total)))
    }

    /// Direct replies of one comment, oldest first
    #[instrument(skip(self))]
    pub async fn list_replies(
        &self,
        comment_id: Snowflake,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<CommentResponse>> {
        let repo = self.ctx.comment_repo();
        repo.find_by_id(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        let replies = repo.list_replies(comment_id, page).await?;
        let total = repo.count_replies(comment_id).await?;

        Ok(PaginatedResponse::new(
            replies.into_iter().map(CommentResponse::from).collect(),
            page.meta(total),
        ))
    }

    /// Replace the body of the actor's own comment
    #[instrument(skip(self, content), fields(actor_id = %actor.id))]
    pub async fn edit_comment(
        &self,
        actor: Actor,
        comment_id: Snowflake,
        content: &str,
    ) -> ServiceResult<CommentResponse> {
        let content = self.ctx.thread_rules().normalize_content(content)?;
        let mut comment = self.live_comment(comment_id).await?;

        if !comment.is_authored_by(actor.id) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        if !self
            .ctx
            .comment_repo()
            .update_content(comment_id, &content)
            .await?
        {
            return Err(DomainError::CommentNotFound(comment_id).into());
        }

        comment.edit(content);
        info!(comment_id = %comment_id, "Comment edited");

        Ok(CommentResponse::from(comment))
    }

    /// Soft-delete a comment. Its replies and every `reply_count` stay as they are.
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn delete_comment(&self, actor: Actor, comment_id: Snowflake) -> ServiceResult<()> {
        let comment = self.live_comment(comment_id).await?;

        AccessPolicy::require(
            actor.role,
            actor.id,
            comment.author_id,
            Capabilities::DELETE_ANY_COMMENT,
            "delete comment",
        )?;

        if !self.ctx.comment_repo().soft_delete(comment_id).await? {
            return Err(DomainError::CommentNotFound(comment_id).into());
        }

        info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    async fn live_comment(&self, comment_id: Snowflake) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .filter(|comment| !comment.is_deleted)
            .ok_or_else(|| DomainError::CommentNotFound(comment_id).into())
    }
}
