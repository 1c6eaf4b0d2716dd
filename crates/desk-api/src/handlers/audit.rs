//! Audit trail handlers (admin only)

use axum::{extract::State, Json};
use desk_core::UserRole;
use desk_service::{AuditLogResponse, AuditService, PaginatedResponse};

use crate::extractors::{AuthUser, Pagination};
use crate::response::ApiResult;
use crate::state::AppState;

/// List audit entries, newest first
///
/// GET /audit?page=1&per_page=10
pub async fn list_audit_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<AuditLogResponse>>> {
    auth.require_role(UserRole::Admin)?;

    let service = AuditService::new(state.service_context());
    let response = service.list(pagination.page, pagination.per_page).await?;
    Ok(Json(response))
}
