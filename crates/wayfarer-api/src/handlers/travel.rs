//! Travel plan and join request handlers

use axum::{extract::State, Json};
use wayfarer_service::dto::{
    CreateTravelPlanRequest, CreateTravelRequestRequest, RespondTravelRequestRequest,
    TravelPlanResponse, TravelRequestResponse,
};
use wayfarer_service::TravelService;

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /travel-plans
pub async fn create_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateTravelPlanRequest>,
) -> ApiResult<Created<Json<TravelPlanResponse>>> {
    let service = TravelService::new(state.service_context());
    let plan = service.create_plan(auth.actor(), request).await?;
    Ok(Created(Json(plan)))
}

/// GET /travel-plans/{plan_id}
pub async fn get_plan(
    State(state): State<AppState>,
    IdPath(plan_id): IdPath,
) -> ApiResult<Json<TravelPlanResponse>> {
    let service = TravelService::new(state.service_context());
    Ok(Json(service.get_plan(plan_id).await?))
}

/// POST /travel-plans/{plan_id}/requests
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(plan_id): IdPath,
    ValidatedJson(request): ValidatedJson<CreateTravelRequestRequest>,
) -> ApiResult<Created<Json<TravelRequestResponse>>> {
    let service = TravelService::new(state.service_context());
    let created = service.create_request(auth.actor(), plan_id, request).await?;
    Ok(Created(Json(created)))
}

/// GET /travel-plans/{plan_id}/requests
pub async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(plan_id): IdPath,
) -> ApiResult<Json<Vec<TravelRequestResponse>>> {
    let service = TravelService::new(state.service_context());
    Ok(Json(service.list_requests(auth.actor(), plan_id).await?))
}

/// Accept or reject a pending request
///
/// PATCH /travel-requests/{request_id}
pub async fn respond(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(request_id): IdPath,
    ValidatedJson(request): ValidatedJson<RespondTravelRequestRequest>,
) -> ApiResult<Json<TravelRequestResponse>> {
    let service = TravelService::new(state.service_context());
    let answered = service
        .respond(auth.actor(), request_id, request.status)
        .await?;
    Ok(Json(answered))
}
