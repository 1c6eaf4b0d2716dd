//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{RequestStatus, UserRole};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Travel request not found: {0}")]
    RequestNotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Department not found: {0}")]
    DepartmentNotFound(i64),

    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    // =========================================================================
    // Workflow Errors
    // =========================================================================
    #[error("No transition from {from} to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Actor {actor_id} is not the assigned manager for this request")]
    NotAssignedManager { actor_id: i64 },

    #[error("Role {role} is not permitted to move a request to {to}")]
    RoleNotPermitted { role: UserRole, to: RequestStatus },

    #[error("Comments are required when returning a request")]
    MissingComments,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Travel start date must not be after the end date")]
    InvalidDateRange,

    #[error("Unknown request status: {0}")]
    UnknownStatus(String),

    #[error("Unknown user role: {0}")]
    UnknownRole(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Travel request {0} was modified concurrently")]
    StaleRequest(i64),

    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Document render error: {0}")]
    RenderError(String),

    #[error("Mail error: {0}")]
    MailError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::RequestNotFound(_) => "UNKNOWN_TRAVEL_REQUEST",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::DepartmentNotFound(_) => "UNKNOWN_DEPARTMENT",
            Self::ProjectNotFound(_) => "UNKNOWN_PROJECT",

            // Workflow
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotAssignedManager { .. } => "NOT_ASSIGNED_MANAGER",
            Self::RoleNotPermitted { .. } => "ROLE_NOT_PERMITTED",
            Self::MissingComments => "COMMENTS_REQUIRED",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::UnknownStatus(_) => "UNKNOWN_STATUS",
            Self::UnknownRole(_) => "UNKNOWN_ROLE",

            // Conflict
            Self::StaleRequest(_) => "CONFLICT",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::NotificationError(_) => "NOTIFICATION_ERROR",
            Self::RenderError(_) => "RENDER_ERROR",
            Self::MailError(_) => "MAIL_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RequestNotFound(_)
                | Self::UserNotFound(_)
                | Self::DepartmentNotFound(_)
                | Self::ProjectNotFound(_)
        )
    }

    /// Check if this is a validation error (including an illegal transition)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidDateRange
                | Self::UnknownStatus(_)
                | Self::UnknownRole(_)
                | Self::InvalidTransition { .. }
                | Self::MissingComments
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAssignedManager { .. } | Self::RoleNotPermitted { .. }
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StaleRequest(_) | Self::EmailAlreadyExists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::RequestNotFound(42);
        assert_eq!(err.code(), "UNKNOWN_TRAVEL_REQUEST");

        let err = DomainError::InvalidTransition {
            from: RequestStatus::Completed,
            to: RequestStatus::Booked,
        };
        assert_eq!(err.code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::RequestNotFound(1).is_not_found());
        assert!(DomainError::UserNotFound(1).is_not_found());
        assert!(!DomainError::EmailAlreadyExists.is_not_found());
    }

    #[test]
    fn test_is_authorization() {
        assert!(DomainError::NotAssignedManager { actor_id: 9 }.is_authorization());
        assert!(DomainError::RoleNotPermitted {
            role: UserRole::Employee,
            to: RequestStatus::Booked
        }
        .is_authorization());
        assert!(!DomainError::RequestNotFound(1).is_authorization());
    }

    #[test]
    fn test_is_conflict() {
        assert!(DomainError::StaleRequest(42).is_conflict());
        assert!(!DomainError::MissingComments.is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidTransition {
            from: RequestStatus::Pending,
            to: RequestStatus::Booked,
        };
        assert_eq!(err.to_string(), "No transition from Pending to Booked");

        let err = DomainError::StaleRequest(42);
        assert_eq!(
            err.to_string(),
            "Travel request 42 was modified concurrently"
        );
    }
}
