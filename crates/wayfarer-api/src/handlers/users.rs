//! User handlers
//!
//! Public profiles and the follow graph.

use axum::{extract::State, Json};
use wayfarer_service::dto::{FollowResponse, PaginatedResponse, PublicUserResponse};
use wayfarer_service::{FollowService, UserService};

use crate::extractors::{AuthUser, IdPath, PagePagination};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<PublicUserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_user(user_id).await?))
}

/// Toggle following `user_id`; the counters in the response are the target's
///
/// PUT /users/{user_id}/follow
pub async fn toggle_follow(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<FollowResponse>> {
    let service = FollowService::new(state.service_context());
    Ok(Json(service.toggle_follow(auth.actor(), user_id).await?))
}

/// GET /users/{user_id}/followers
pub async fn list_followers(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
    PagePagination(page): PagePagination,
) -> ApiResult<Json<PaginatedResponse<PublicUserResponse>>> {
    let service = FollowService::new(state.service_context());
    Ok(Json(service.list_followers(user_id, page).await?))
}

/// GET /users/{user_id}/following
pub async fn list_following(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
    PagePagination(page): PagePagination,
) -> ApiResult<Json<PaginatedResponse<PublicUserResponse>>> {
    let service = FollowService::new(state.service_context());
    Ok(Json(service.list_following(user_id, page).await?))
}
