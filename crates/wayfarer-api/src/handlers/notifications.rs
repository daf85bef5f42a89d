//! Notification inbox handlers

use axum::{extract::State, Json};
use wayfarer_service::dto::{MarkAllReadResponse, NotificationListResponse};
use wayfarer_service::NotificationService;

use crate::extractors::{AuthUser, IdPath, PagePagination};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    PagePagination(page): PagePagination,
) -> ApiResult<Json<NotificationListResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.list(auth.actor(), page).await?))
}

/// PATCH /notifications/{notification_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(notification_id): IdPath,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.mark_read(auth.actor(), notification_id).await?;
    Ok(NoContent)
}

/// PATCH /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let service = NotificationService::new(state.service_context());
    Ok(Json(service.mark_all_read(auth.actor()).await?))
}
