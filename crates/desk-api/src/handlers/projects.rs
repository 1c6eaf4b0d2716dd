//! Project handlers

use axum::{extract::State, Json};
use desk_core::entities::Project;
use desk_core::UserRole;
use desk_service::{CreateProjectRequest, ProjectResponse};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// List active projects
///
/// GET /projects
pub async fn list_projects(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let projects = state
        .service_context()
        .project_repo()
        .find_all()
        .await
        .map_err(ApiError::Domain)?;
    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}

/// Create a project
///
/// POST /projects
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<Created<Json<ProjectResponse>>> {
    auth.require_role(UserRole::Admin)?;

    let project = Project::new(request.project_name, auth.user_id);
    let created = state
        .service_context()
        .project_repo()
        .create(&project)
        .await
        .map_err(ApiError::Domain)?;
    Ok(Created(Json(ProjectResponse::from(&created))))
}
