//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Paginated response with page-based pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                page,
                per_page,
                total,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: UserResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// Full user response
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub department_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<i64>,
    pub created_on: DateTime<Utc>,
}

/// Minimal user info embedded in other responses
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

// ============================================================================
// Travel Request Responses
// ============================================================================

/// Travel request response
#[derive(Debug, Clone, Serialize)]
pub struct TravelRequestResponse {
    pub id: i64,
    pub requester: UserSummary,
    pub project_id: i64,
    pub department_id: i64,
    pub reason_for_travel: String,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub from_location: String,
    pub to_location: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    pub created_on: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

// ============================================================================
// Department / Project Responses
// ============================================================================

/// Department response
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentResponse {
    pub id: i64,
    pub department_name: String,
    pub created_on: DateTime<Utc>,
}

/// Project response
#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub project_name: String,
    pub created_on: DateTime<Utc>,
}

// ============================================================================
// Audit Responses
// ============================================================================

/// Audit log entry response
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogResponse {
    pub id: i64,
    pub acting_user_id: i64,
    pub entity_name: String,
    pub entity_id: i64,
    pub action_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Statistics Responses
// ============================================================================

/// Requests per status
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Request statistics, admin-wide or scoped to one manager's reports
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub total_requests: i64,
    pub by_status: Vec<StatusCount>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy() -> Self {
        Self { status: "ok" }
    }
}

/// Readiness response with dependency health
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: bool,
}

impl ReadinessResponse {
    #[must_use]
    pub fn ready(database: bool) -> Self {
        Self {
            status: if database { "ready" } else { "degraded" },
            database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_status() {
        assert_eq!(ReadinessResponse::ready(true).status, "ready");
        assert_eq!(ReadinessResponse::ready(false).status, "degraded");
    }

    #[test]
    fn test_paginated_response() {
        let response = PaginatedResponse::new(vec![1, 2, 3], 1, 10, 3);
        assert_eq!(response.pagination.page, 1);
        assert_eq!(response.pagination.total, 3);
    }
}
