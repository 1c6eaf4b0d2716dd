//! Data transfer objects for API requests and responses
//!
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    BookTicketRequest, CommentRequest, CreateDepartmentRequest, CreateProjectRequest,
    CreateTravelRequestRequest, CreateUserRequest, LoginRequest, RefreshTokenRequest,
    ReturnRequest, UpdateUserRequest,
};

// Re-export commonly used response types
pub use responses::{
    AuditLogResponse, AuthResponse, DepartmentResponse, HealthResponse, PaginatedResponse,
    PaginationMeta, ProjectResponse, ReadinessResponse, StatisticsResponse, StatusCount,
    TravelRequestResponse, UserResponse, UserSummary,
};
