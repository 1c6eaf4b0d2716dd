//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{AuditEntry, Department, Project, TravelRequest, User};
use crate::error::DomainError;
use crate::value_objects::{RequestStatus, UserRole};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Travel Request Repository
// ============================================================================

#[async_trait]
pub trait TravelRequestRepository: Send + Sync {
    /// Find an active request by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<TravelRequest>>;

    /// List active requests filed by a requester, newest first
    async fn find_by_requester(&self, requester_id: i64) -> RepoResult<Vec<TravelRequest>>;

    /// List active requests whose requester reports to this manager
    async fn find_by_manager(&self, manager_id: i64) -> RepoResult<Vec<TravelRequest>>;

    /// List active requests in a given status
    async fn find_by_status(&self, status: RequestStatus) -> RepoResult<Vec<TravelRequest>>;

    /// List all active requests, newest first
    async fn find_all(&self) -> RepoResult<Vec<TravelRequest>>;

    /// Insert a new request and return it with its assigned ID
    async fn create(&self, request: &TravelRequest) -> RepoResult<TravelRequest>;

    /// Commit a mutated request if the stored row still carries
    /// `expected_version`. Bumps the version on success.
    ///
    /// # Errors
    /// `StaleRequest` when the row exists but the version no longer
    /// matches (a concurrent writer won); `RequestNotFound` when the row
    /// is gone or inactive.
    async fn commit(&self, request: &TravelRequest, expected_version: i32) -> RepoResult<()>;

    /// Soft-deactivate a request
    async fn deactivate(&self, id: i64) -> RepoResult<()>;

    /// Count active requests, optionally narrowed to a status and/or the
    /// reports of one manager
    async fn count(
        &self,
        status: Option<RequestStatus>,
        manager_id: Option<i64>,
    ) -> RepoResult<i64>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an active user by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// Find an active user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// List active users holding a role
    async fn find_by_role(&self, role: UserRole) -> RepoResult<Vec<User>>;

    /// List active users in a department
    async fn find_by_department(&self, department_id: i64) -> RepoResult<Vec<User>>;

    /// List active users reporting to a manager
    async fn find_by_manager(&self, manager_id: i64) -> RepoResult<Vec<User>>;

    /// List all active users
    async fn find_all(&self) -> RepoResult<Vec<User>>;

    /// Check if an email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Insert a new user and return it with its assigned ID
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User>;

    /// Update an existing user
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Soft-deactivate a user
    async fn deactivate(&self, id: i64) -> RepoResult<()>;

    /// Get the password hash for authentication
    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>>;
}

// ============================================================================
// Audit Repository
// ============================================================================

/// Append-only audit log. Entries are never mutated or deleted; the store
/// is safe for concurrent writers.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Append one entry
    async fn record(&self, entry: &AuditEntry) -> RepoResult<()>;

    /// List entries, newest first, with offset pagination
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<AuditEntry>>;

    /// Total number of entries
    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Department / Project Repositories
// ============================================================================

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Department>>;
    async fn find_all(&self) -> RepoResult<Vec<Department>>;
    async fn create(&self, department: &Department) -> RepoResult<Department>;
    async fn update(&self, department: &Department) -> RepoResult<()>;
    async fn deactivate(&self, id: i64) -> RepoResult<()>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Project>>;
    async fn find_all(&self) -> RepoResult<Vec<Project>>;
    async fn create(&self, project: &Project) -> RepoResult<Project>;
    async fn update(&self, project: &Project) -> RepoResult<()>;
    async fn deactivate(&self, id: i64) -> RepoResult<()>;
}
