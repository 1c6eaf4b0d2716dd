//! Error handling utilities for repositories

use desk_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "travel request not found" error
pub fn request_not_found(id: i64) -> DomainError {
    DomainError::RequestNotFound(id)
}

/// Create a "user not found" error
pub fn user_not_found(id: i64) -> DomainError {
    DomainError::UserNotFound(id)
}

/// Create a "department not found" error
pub fn department_not_found(id: i64) -> DomainError {
    DomainError::DepartmentNotFound(id)
}

/// Create a "project not found" error
pub fn project_not_found(id: i64) -> DomainError {
    DomainError::ProjectNotFound(id)
}
