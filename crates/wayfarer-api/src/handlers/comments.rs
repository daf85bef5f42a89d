//! Comment thread handlers

use axum::{extract::State, Json};
use wayfarer_service::dto::{
    CommentResponse, CommentThreadResponse, CreateCommentRequest, PaginatedResponse,
    UpdateCommentRequest,
};
use wayfarer_service::CommentService;

use crate::extractors::{AuthUser, IdPath, PagePagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Root comments, newest first, each with its reply preview
///
/// GET /posts/{post_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    IdPath(post_id): IdPath,
    PagePagination(page): PagePagination,
) -> ApiResult<Json<PaginatedResponse<CommentThreadResponse>>> {
    let service = CommentService::new(state.service_context());
    Ok(Json(service.list_comments(post_id, page).await?))
}

/// POST /posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let comment = service
        .create_comment(auth.actor(), post_id, &request.content, request.parent_id)
        .await?;
    Ok(Created(Json(comment)))
}

/// GET /comments/{comment_id}/replies
pub async fn list_replies(
    State(state): State<AppState>,
    IdPath(comment_id): IdPath,
    PagePagination(page): PagePagination,
) -> ApiResult<Json<PaginatedResponse<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    Ok(Json(service.list_replies(comment_id, page).await?))
}

/// PATCH /comments/{comment_id}
pub async fn edit_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(comment_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let comment = service
        .edit_comment(auth.actor(), comment_id, &request.content)
        .await?;
    Ok(Json(comment))
}

/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<NoContent> {
    let service = CommentService::new(state.service_context());
    service.delete_comment(auth.actor(), comment_id).await?;
    Ok(NoContent)
}
