//! Post handlers
//!
//! Post lifecycle plus the vote and save toggles that hang off a post.

use axum::{extract::State, Json};
use wayfarer_service::dto::{
    CreatePostRequest, PaginatedResponse, PostResponse, SaveResponse, UpdatePostRequest,
    VoteRequest, VoteResponse, VoteStatusResponse,
};
use wayfarer_service::{PostService, SavedPostService, VoteService};

use crate::extractors::{AuthUser, FeedSort, IdPath, PagePagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let post = service.create_post(auth.actor(), request).await?;
    Ok(Created(Json(post)))
}

/// GET /posts?page=&limit=&sort=latest|popular
pub async fn list_posts(
    State(state): State<AppState>,
    PagePagination(page): PagePagination,
    FeedSort(sort): FeedSort,
) -> ApiResult<Json<PaginatedResponse<PostResponse>>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.list_posts(page, sort).await?))
}

/// GET /users/@me/posts
pub async fn list_my_posts(
    State(state): State<AppState>,
    auth: AuthUser,
    PagePagination(page): PagePagination,
) -> ApiResult<Json<PaginatedResponse<PostResponse>>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.list_my_posts(auth.actor(), page).await?))
}

/// GET /posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    IdPath(post_id): IdPath,
) -> ApiResult<Json<PostResponse>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.get_post(post_id).await?))
}

/// PATCH /posts/{post_id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.update_post(auth.actor(), post_id, request).await?))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<NoContent> {
    let service = PostService::new(state.service_context());
    service.delete_post(auth.actor(), post_id).await?;
    Ok(NoContent)
}

/// Toggle the caller's vote
///
/// PUT /posts/{post_id}/vote
pub async fn toggle_vote(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
    ValidatedJson(request): ValidatedJson<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let service = VoteService::new(state.service_context());
    let response = service.toggle_vote(auth.actor(), post_id, request.kind).await?;
    Ok(Json(response))
}

/// GET /posts/{post_id}/vote
pub async fn vote_status(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<Json<VoteStatusResponse>> {
    let service = VoteService::new(state.service_context());
    Ok(Json(service.vote_status(auth.actor(), post_id).await?))
}

/// PUT /posts/{post_id}/save
pub async fn toggle_save(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<Json<SaveResponse>> {
    let service = SavedPostService::new(state.service_context());
    Ok(Json(service.toggle_save(auth.actor(), post_id).await?))
}

/// GET /users/@me/saved-posts
pub async fn list_saved(
    State(state): State<AppState>,
    auth: AuthUser,
    PagePagination(page): PagePagination,
) -> ApiResult<Json<PaginatedResponse<PostResponse>>> {
    let service = SavedPostService::new(state.service_context());
    Ok(Json(service.list_saved(auth.actor(), page).await?))
}
