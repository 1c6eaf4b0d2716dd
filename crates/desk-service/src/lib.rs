//! # desk-service
//!
//! Application layer containing the travel-request workflow engine, the
//! side-effect dispatcher, supporting services, and DTOs.

pub mod dto;
pub mod services;

// Re-export commonly used types at crate root
pub use dto::{
    AuditLogResponse, AuthResponse, BookTicketRequest, CommentRequest, CreateDepartmentRequest,
    CreateProjectRequest, CreateTravelRequestRequest, CreateUserRequest, DepartmentResponse,
    HealthResponse, LoginRequest, PaginatedResponse, ProjectResponse, ReadinessResponse,
    RefreshTokenRequest, ReturnRequest, StatisticsResponse, TravelRequestResponse,
    UpdateUserRequest, UserResponse,
};
pub use services::{
    AuditService, AuthService, PdfTicketRenderer, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SideEffectDispatcher, SmtpMailSender, StatisticsService,
    TransitionInput, TravelRequestService, UserService, WorkflowService,
};
