//! Post service
//!
//! Post lifecycle and the feeds; votes and saves live in their own services.

use tracing::{info, instrument};

use wayfarer_core::entities::{Post, PostSort};
use wayfarer_core::rules::AccessPolicy;
use wayfarer_core::{Capabilities, DomainError, PageRequest, Snowflake};

use crate::dto::{CreatePostRequest, PaginatedResponse, PostResponse, UpdatePostRequest};

use super::context::{Actor, ServiceContext};
use super::error::ServiceResult;
use super::vote::live_post;

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(actor_id = %actor.id))]
    pub async fn create_post(&self, actor: Actor, request: CreatePostRequest) -> ServiceResult<PostResponse> {
        let mut post = Post::new(
            self.ctx.generate_id(),
            actor.id,
            request.title.trim().to_string(),
            request.content,
            request.category,
        );
        post.premium = request.premium;

        self.ctx.post_repo().create(&post).await?;
        info!(post_id = %post.id, "Post created");

        Ok(PostResponse::from(&post))
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: Snowflake) -> ServiceResult<PostResponse> {
        let post = live_post(self.ctx, post_id).await?;
        Ok(PostResponse::from(&post))
    }

    /// Live posts, newest or most upvoted first
    #[instrument(skip(self))]
    pub async fn list_posts(
        &self,
        page: PageRequest,
        sort: PostSort,
    ) -> ServiceResult<PaginatedResponse<PostResponse>> {
        let repo = self.ctx.post_repo();
        let posts = repo.list(page, sort).await?;
        let total = repo.count_live().await?;

        Ok(PaginatedResponse::new(
            posts.iter().map(PostResponse::from).collect(),
            page.meta(total),
        ))
    }

    /// The actor's own live posts, newest first
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn list_my_posts(
        &self,
        actor: Actor,
        page: PageRequest,
    ) -> ServiceResult<PaginatedResponse<PostResponse>> {
        let repo = self.ctx.post_repo();
        let posts = repo.list_by_author(actor.id, page).await?;
        let total = repo.count_by_author(actor.id).await?;

        Ok(PaginatedResponse::new(
            posts.iter().map(PostResponse::from).collect(),
            page.meta(total),
        ))
    }

    /// Author-only edit. Counters are not part of the write, so a concurrent vote is never lost.
    #[instrument(skip(self, request), fields(actor_id = %actor.id))]
    pub async fn update_post(
        &self,
        actor: Actor,
        post_id: Snowflake,
        request: UpdatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let mut post = live_post(self.ctx, post_id).await?;

        if !post.is_authored_by(actor.id) {
            return Err(DomainError::Forbidden("edit post".into()).into());
        }

        post.apply_edit(
            request.title.map(|title| title.trim().to_string()),
            request.content,
            request.category,
            request.premium,
        );

        if !self.ctx.post_repo().update_details(&post).await? {
            return Err(DomainError::PostNotFound(post_id).into());
        }

        info!(post_id = %post_id, "Post updated");
        Ok(PostResponse::from(&post))
    }

    /// Soft-delete; votes, saves, and comments stay but stop being reachable
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn delete_post(&self, actor: Actor, post_id: Snowflake) -> ServiceResult<()> {
        let post = live_post(self.ctx, post_id).await?;

        AccessPolicy::require(
            actor.role,
            actor.id,
            post.author_id,
            Capabilities::DELETE_ANY_POST,
            "delete post",
        )?;

        if !self.ctx.post_repo().soft_delete(post_id).await? {
            return Err(DomainError::PostNotFound(post_id).into());
        }

        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }
}
