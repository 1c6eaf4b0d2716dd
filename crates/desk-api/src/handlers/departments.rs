//! Department handlers

use axum::{extract::State, Json};
use desk_core::entities::Department;
use desk_core::UserRole;
use desk_service::{CreateDepartmentRequest, DepartmentResponse};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// List active departments
///
/// GET /departments
pub async fn list_departments(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .service_context()
        .department_repo()
        .find_all()
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(departments.iter().map(DepartmentResponse::from).collect()))
}

/// Create a department
///
/// POST /departments
pub async fn create_department(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateDepartmentRequest>,
) -> ApiResult<Created<Json<DepartmentResponse>>> {
    auth.require_role(UserRole::Admin)?;

    let department = Department::new(request.department_name, auth.user_id);
    let created = state
        .service_context()
        .department_repo()
        .create(&department)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Created(Json(DepartmentResponse::from(&created))))
}
