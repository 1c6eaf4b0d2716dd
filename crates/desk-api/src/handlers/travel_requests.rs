//! Travel request handlers (employee surface)

use axum::{
    extract::{Path, State},
    Json,
};
use desk_core::RequestStatus;
use desk_service::{
    CreateTravelRequestRequest, TransitionInput, TravelRequestResponse, TravelRequestService,
    WorkflowService,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// File a new travel request
///
/// POST /travel-requests
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateTravelRequestRequest>,
) -> ApiResult<Created<Json<TravelRequestResponse>>> {
    let service = TravelRequestService::new(state.service_context());
    let response = service.create(auth.actor(), request).await?;
    Ok(Created(Json(response)))
}

/// List the caller's own requests
///
/// GET /travel-requests/mine
pub async fn get_my_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TravelRequestResponse>>> {
    let service = TravelRequestService::new(state.service_context());
    let responses = service.list_for_requester(auth.user_id).await?;
    Ok(Json(responses))
}

/// Get one request
///
/// GET /travel-requests/{request_id}
pub async fn get_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
) -> ApiResult<Json<TravelRequestResponse>> {
    let service = TravelRequestService::new(state.service_context());
    service.authorize_read(request_id, auth.actor()).await?;
    let response = service.get(request_id).await?;
    Ok(Json(response))
}

/// Resubmit a returned request
///
/// POST /travel-requests/{request_id}/resubmit
pub async fn resubmit_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
) -> ApiResult<Json<TravelRequestResponse>> {
    let workflow = WorkflowService::new(state.service_context());
    let updated = workflow
        .transition(
            request_id,
            RequestStatus::Pending,
            auth.actor(),
            TransitionInput::default(),
        )
        .await?;

    let service = TravelRequestService::new(state.service_context());
    let response = service.get(updated.id).await?;
    Ok(Json(response))
}
