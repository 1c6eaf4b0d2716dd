//! User management handlers (admin only)

use axum::{
    extract::{Path, State},
    Json,
};
use desk_core::UserRole;
use desk_service::{CreateUserRequest, UpdateUserRequest, UserResponse, UserService};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List all active users
///
/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    auth.require_role(UserRole::Admin)?;

    let service = UserService::new(state.service_context());
    let responses = service.list().await?;
    Ok(Json(responses))
}

/// Create a user account
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    auth.require_role(UserRole::Admin)?;

    let service = UserService::new(state.service_context());
    let response = service.create(auth.actor(), request).await?;
    Ok(Created(Json(response)))
}

/// Get one user
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    auth.require_role(UserRole::Admin)?;

    let service = UserService::new(state.service_context());
    let response = service.get(user_id).await?;
    Ok(Json(response))
}

/// Update a user
///
/// PATCH /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    auth.require_role(UserRole::Admin)?;

    let service = UserService::new(state.service_context());
    let response = service.update(auth.actor(), user_id, request).await?;
    Ok(Json(response))
}

/// Soft-deactivate a user
///
/// DELETE /users/{user_id}
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> ApiResult<NoContent> {
    auth.require_role(UserRole::Admin)?;

    let service = UserService::new(state.service_context());
    service.deactivate(auth.actor(), user_id).await?;
    Ok(NoContent)
}
