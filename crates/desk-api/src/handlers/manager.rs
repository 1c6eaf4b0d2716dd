//! Manager handlers
//!
//! Review surface for the requests of a manager's reports. Edge-level
//! authorization (assigned manager only) lives in the workflow engine;
//! these handlers just thread the authenticated actor through.

use axum::{
    extract::{Path, State},
    Json,
};
use desk_core::{RequestStatus, UserRole};
use desk_service::{
    CommentRequest, ReturnRequest, StatisticsResponse, StatisticsService, TransitionInput,
    TravelRequestResponse, TravelRequestService, UserResponse, UserService, WorkflowService,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// List requests pending the caller's review
///
/// GET /manager/requests
pub async fn get_pending_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TravelRequestResponse>>> {
    auth.require_role(UserRole::Manager)?;

    let service = TravelRequestService::new(state.service_context());
    let responses = service.list_pending_for_manager(auth.user_id).await?;
    Ok(Json(responses))
}

/// List all requests of the caller's reports
///
/// GET /manager/requests/all
pub async fn get_all_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TravelRequestResponse>>> {
    auth.require_role(UserRole::Manager)?;

    let service = TravelRequestService::new(state.service_context());
    let responses = service.list_for_manager(auth.user_id).await?;
    Ok(Json(responses))
}

/// Approve a pending request
///
/// PUT /manager/requests/{request_id}/approve
pub async fn approve_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<CommentRequest>,
) -> ApiResult<Json<TravelRequestResponse>> {
    transition(&state, auth, request_id, RequestStatus::Approved, TransitionInput {
        comments: request.comments,
        ticket_url: None,
    })
    .await
}

/// Reject a pending request
///
/// PUT /manager/requests/{request_id}/reject
pub async fn reject_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<CommentRequest>,
) -> ApiResult<Json<TravelRequestResponse>> {
    transition(&state, auth, request_id, RequestStatus::Rejected, TransitionInput {
        comments: request.comments,
        ticket_url: None,
    })
    .await
}

/// Return a request to the employee for corrections
///
/// POST /manager/requests/{request_id}/return-to-employee
pub async fn return_to_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ReturnRequest>,
) -> ApiResult<Json<TravelRequestResponse>> {
    transition(
        &state,
        auth,
        request_id,
        RequestStatus::ReturnedToEmployee,
        TransitionInput::with_comments(request.comments),
    )
    .await
}

/// List the caller's team members
///
/// GET /manager/team
pub async fn get_team_members(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    auth.require_role(UserRole::Manager)?;

    let service = UserService::new(state.service_context());
    let responses = service.team_members(auth.user_id).await?;
    Ok(Json(responses))
}

/// Request statistics for the caller's team
///
/// GET /manager/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<StatisticsResponse>> {
    auth.require_role(UserRole::Manager)?;

    let service = StatisticsService::new(state.service_context());
    let response = service.for_manager(auth.user_id).await?;
    Ok(Json(response))
}

async fn transition(
    state: &AppState,
    auth: AuthUser,
    request_id: i64,
    target: RequestStatus,
    input: TransitionInput,
) -> Result<Json<TravelRequestResponse>, ApiError> {
    let workflow = WorkflowService::new(state.service_context());
    let updated = workflow
        .transition(request_id, target, auth.actor(), input)
        .await?;

    let service = TravelRequestService::new(state.service_context());
    let response = service.get(updated.id).await?;
    Ok(Json(response))
}
