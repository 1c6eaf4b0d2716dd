//! Travel admin handlers
//!
//! Booking surface: list/filter requests, book tickets, return requests,
//! close completed travel, and serve the rendered ticket PDF.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use desk_core::entities::TicketDetails;
use desk_core::{DomainError, RequestStatus, UserRole};
use desk_service::{
    BookTicketRequest, ReturnRequest, StatisticsResponse, StatisticsService, TransitionInput,
    TravelRequestResponse, TravelRequestService, WorkflowService,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// List every active request
///
/// GET /travel-requests
pub async fn get_all_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TravelRequestResponse>>> {
    auth.require_any_role(&[UserRole::TravelAdmin, UserRole::Admin])?;

    let service = TravelRequestService::new(state.service_context());
    let responses = service.list_all().await?;
    Ok(Json(responses))
}

/// List requests in one status
///
/// GET /travel-requests/by-status/{status}
pub async fn get_requests_by_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(status): Path<String>,
) -> ApiResult<Json<Vec<TravelRequestResponse>>> {
    auth.require_any_role(&[UserRole::TravelAdmin, UserRole::Admin])?;

    let status: RequestStatus = status
        .parse()
        .map_err(|_| ApiError::invalid_path(format!("Unknown status: {status}")))?;

    let service = TravelRequestService::new(state.service_context());
    let responses = service.list_by_status(status).await?;
    Ok(Json(responses))
}

/// Request statistics across all requests
///
/// GET /travel-requests/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<StatisticsResponse>> {
    auth.require_any_role(&[UserRole::TravelAdmin, UserRole::Admin])?;

    let service = StatisticsService::new(state.service_context());
    let response = service.overall().await?;
    Ok(Json(response))
}

/// Book the ticket for an approved request
///
/// POST /travel-requests/{request_id}/book
pub async fn book_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<BookTicketRequest>,
) -> ApiResult<Json<TravelRequestResponse>> {
    transition(
        &state,
        auth,
        request_id,
        RequestStatus::Booked,
        TransitionInput {
            comments: request.comments,
            ticket_url: request.ticket_url,
        },
    )
    .await
}

/// Return a request to the manager
///
/// POST /travel-requests/{request_id}/return-to-manager
pub async fn return_to_manager(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ReturnRequest>,
) -> ApiResult<Json<TravelRequestResponse>> {
    transition(
        &state,
        auth,
        request_id,
        RequestStatus::ReturnedToManager,
        TransitionInput::with_comments(request.comments),
    )
    .await
}

/// Return a request to the employee
///
/// POST /travel-requests/{request_id}/return-to-employee
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

/// Close a booked request
///
/// POST /travel-requests/{request_id}/close
pub async fn close_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
) -> ApiResult<Json<TravelRequestResponse>> {
    transition(
        &state,
        auth,
        request_id,
        RequestStatus::Completed,
        TransitionInput::default(),
    )
    .await
}

/// Download the ticket PDF for a request
///
/// GET /travel-requests/{request_id}/ticket
pub async fn download_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<i64>,
) -> ApiResult<Response> {
    let ctx = state.service_context();

    let service = TravelRequestService::new(ctx);
    service.authorize_read(request_id, auth.actor()).await?;

    let request = ctx
        .travel_request_repo()
        .find_by_id(request_id)
        .await
        .map_err(ApiError::Domain)?
        .ok_or(ApiError::Domain(DomainError::RequestNotFound(request_id)))?;

    let requester = ctx
        .user_repo()
        .find_by_id(request.requester_id)
        .await
        .map_err(ApiError::Domain)?
        .ok_or(ApiError::Domain(DomainError::UserNotFound(request.requester_id)))?;

    let project_name = ctx
        .project_repo()
        .find_by_id(request.project_id)
        .await
        .map_err(ApiError::Domain)?
        .map(|p| p.name)
        .unwrap_or_default();
    let department_name = ctx
        .department_repo()
        .find_by_id(request.department_id)
        .await
        .map_err(ApiError::Domain)?
        .map(|d| d.name)
        .unwrap_or_default();

    let details = TicketDetails {
        request_id: request.id,
        traveler_name: requester.full_name(),
        traveler_email: requester.email.clone(),
        project_name,
        department_name,
        from_location: request.from_location.clone(),
        to_location: request.to_location.clone(),
        from_date: request.from_date,
        to_date: request.to_date,
        reason_for_travel: request.reason_for_travel.clone(),
        download_url: ctx.ticket_download_url(request.id),
    };

    let bytes = ctx
        .ticket_renderer()
        .render_ticket(&details)
        .await
        .map_err(ApiError::Domain)?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"TravelTicket_{request_id}.pdf\""),
        ),
    ];
    Ok((StatusCode::OK, headers, bytes).into_response())
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
