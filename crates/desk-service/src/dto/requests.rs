//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and (where needed) `Validate`
//! for input validation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// ============================================================================
// Travel Request Requests
// ============================================================================

/// Create travel request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTravelRequestRequest {
    pub project_id: i64,

    #[validate(length(min = 1, max = 2000, message = "Reason must be 1-2000 characters"))]
    pub reason_for_travel: String,

    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,

    #[validate(length(min = 1, max = 255, message = "From location must be 1-255 characters"))]
    pub from_location: String,

    #[validate(length(min = 1, max = 255, message = "To location must be 1-255 characters"))]
    pub to_location: String,
}

/// Optional comment carried by approve/reject actions
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(max = 2000, message = "Comments must be at most 2000 characters"))]
    pub comments: Option<String>,
}

/// Required comment carried by return actions
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReturnRequest {
    #[validate(length(min = 1, max = 2000, message = "A reason for the return is required"))]
    pub comments: String,
}

/// Booking details for the book action
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookTicketRequest {
    #[validate(url(message = "ticket_url must be a valid URL"))]
    pub ticket_url: Option<String>,

    #[validate(length(max = 2000, message = "Comments must be at most 2000 characters"))]
    pub comments: Option<String>,
}

// ============================================================================
// User Requests
// ============================================================================

/// Create user request (admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    /// Role name: Employee, Manager, TravelAdmin, or Admin
    pub role: String,

    pub department_id: i64,

    pub manager_id: Option<i64>,
}

/// Update user request (admin only)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,

    pub role: Option<String>,

    pub department_id: Option<i64>,

    pub manager_id: Option<i64>,
}

// ============================================================================
// Department / Project Requests
// ============================================================================

/// Create department request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, max = 50, message = "Department name must be 1-50 characters"))]
    pub department_name: String,
}

/// Create project request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 50, message = "Project name must be 1-50 characters"))]
    pub project_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_err());

        let request = LoginRequest {
            email: "asha@corp.example".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_return_request_requires_comments() {
        let request = ReturnRequest {
            comments: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_book_ticket_url_validation() {
        let request = BookTicketRequest {
            ticket_url: Some("not a url".to_string()),
            comments: None,
        };
        assert!(request.validate().is_err());

        let request = BookTicketRequest {
            ticket_url: Some("https://tickets.example/42".to_string()),
            comments: None,
        };
        assert!(request.validate().is_ok());
    }
}
