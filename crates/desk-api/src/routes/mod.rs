//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{
    audit, auth, departments, health, manager, notifications, projects, travel_admin,
    travel_requests, users,
};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(travel_request_routes())
        .merge(manager_routes())
        .merge(admin_routes())
        .merge(notification_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
}

/// Travel request routes (employee + travel admin)
fn travel_request_routes() -> Router<AppState> {
    Router::new()
        // Employee
        .route("/travel-requests", post(travel_requests::create_request))
        .route("/travel-requests/mine", get(travel_requests::get_my_requests))
        .route("/travel-requests/:request_id", get(travel_requests::get_request))
        .route(
            "/travel-requests/:request_id/resubmit",
            post(travel_requests::resubmit_request),
        )
        // Travel admin
        .route("/travel-requests", get(travel_admin::get_all_requests))
        .route(
            "/travel-requests/by-status/:status",
            get(travel_admin::get_requests_by_status),
        )
        .route("/travel-requests/statistics", get(travel_admin::get_statistics))
        .route("/travel-requests/:request_id/book", post(travel_admin::book_ticket))
        .route(
            "/travel-requests/:request_id/return-to-manager",
            post(travel_admin::return_to_manager),
        )
        .route(
            "/travel-requests/:request_id/return-to-employee",
            post(travel_admin::return_to_employee),
        )
        .route("/travel-requests/:request_id/close", post(travel_admin::close_request))
        .route(
            "/travel-requests/:request_id/ticket",
            get(travel_admin::download_ticket),
        )
}

/// Manager routes
fn manager_routes() -> Router<AppState> {
    Router::new()
        .route("/manager/requests", get(manager::get_pending_requests))
        .route("/manager/requests/all", get(manager::get_all_requests))
        .route("/manager/requests/:request_id/approve", put(manager::approve_request))
        .route("/manager/requests/:request_id/reject", put(manager::reject_request))
        .route(
            "/manager/requests/:request_id/return-to-employee",
            post(manager::return_to_employee),
        )
        .route("/manager/team", get(manager::get_team_members))
        .route("/manager/statistics", get(manager::get_statistics))
}

/// Admin routes (users, departments, projects, audit trail)
fn admin_routes() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id", patch(users::update_user))
        .route("/users/:user_id", delete(users::deactivate_user))
        // Departments
        .route("/departments", get(departments::list_departments))
        .route("/departments", post(departments::create_department))
        // Projects
        .route("/projects", get(projects::list_projects))
        .route("/projects", post(projects::create_project))
        // Audit trail
        .route("/audit", get(audit::list_audit_logs))
}

/// Real-time notification routes
fn notification_routes() -> Router<AppState> {
    Router::new().route("/notifications/ws", get(notifications::websocket))
}
