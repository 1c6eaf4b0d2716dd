//! Service context - dependency container for services
//!
//! Holds repositories, collaborator ports, and the JWT service. Everything
//! is behind trait objects so the workflow engine can run against
//! in-memory fakes in tests; the raw database pool never leaks past the
//! repository layer.

use std::sync::Arc;

use desk_common::auth::JwtService;
use desk_core::traits::{
    AuditRepository, DepartmentRepository, MailSender, NotificationChannel, ProjectRepository,
    TicketRenderer, TravelRequestRepository, UserRepository,
};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    travel_request_repo: Arc<dyn TravelRequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    audit_repo: Arc<dyn AuditRepository>,
    department_repo: Arc<dyn DepartmentRepository>,
    project_repo: Arc<dyn ProjectRepository>,

    // Collaborators
    notification_channel: Arc<dyn NotificationChannel>,
    ticket_renderer: Arc<dyn TicketRenderer>,
    mail_sender: Arc<dyn MailSender>,

    // Services
    jwt_service: Arc<JwtService>,

    /// Public base URL used to build ticket download links
    public_base_url: String,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the travel request repository
    pub fn travel_request_repo(&self) -> &dyn TravelRequestRepository {
        self.travel_request_repo.as_ref()
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the audit repository
    pub fn audit_repo(&self) -> &dyn AuditRepository {
        self.audit_repo.as_ref()
    }

    /// Get the department repository
    pub fn department_repo(&self) -> &dyn DepartmentRepository {
        self.department_repo.as_ref()
    }

    /// Get the project repository
    pub fn project_repo(&self) -> &dyn ProjectRepository {
        self.project_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the notification channel
    pub fn notification_channel(&self) -> &dyn NotificationChannel {
        self.notification_channel.as_ref()
    }

    /// Get the ticket renderer
    pub fn ticket_renderer(&self) -> &dyn TicketRenderer {
        self.ticket_renderer.as_ref()
    }

    /// Get the mail sender
    pub fn mail_sender(&self) -> &dyn MailSender {
        self.mail_sender.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Public base URL for links embedded in emails
    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Canonical ticket download URL for a request
    pub fn ticket_download_url(&self, request_id: i64) -> String {
        format!(
            "{}/api/v1/travel-requests/{request_id}/ticket",
            self.public_base_url
        )
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("collaborators", &"...")
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    travel_request_repo: Option<Arc<dyn TravelRequestRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    audit_repo: Option<Arc<dyn AuditRepository>>,
    department_repo: Option<Arc<dyn DepartmentRepository>>,
    project_repo: Option<Arc<dyn ProjectRepository>>,
    notification_channel: Option<Arc<dyn NotificationChannel>>,
    ticket_renderer: Option<Arc<dyn TicketRenderer>>,
    mail_sender: Option<Arc<dyn MailSender>>,
    jwt_service: Option<Arc<JwtService>>,
    public_base_url: Option<String>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            travel_request_repo: None,
            user_repo: None,
            audit_repo: None,
            department_repo: None,
            project_repo: None,
            notification_channel: None,
            ticket_renderer: None,
            mail_sender: None,
            jwt_service: None,
            public_base_url: None,
        }
    }

    pub fn travel_request_repo(mut self, repo: Arc<dyn TravelRequestRepository>) -> Self {
        self.travel_request_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn audit_repo(mut self, repo: Arc<dyn AuditRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    pub fn department_repo(mut self, repo: Arc<dyn DepartmentRepository>) -> Self {
        self.department_repo = Some(repo);
        self
    }

    pub fn project_repo(mut self, repo: Arc<dyn ProjectRepository>) -> Self {
        self.project_repo = Some(repo);
        self
    }

    pub fn notification_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.notification_channel = Some(channel);
        self
    }

    pub fn ticket_renderer(mut self, renderer: Arc<dyn TicketRenderer>) -> Self {
        self.ticket_renderer = Some(renderer);
        self
    }

    pub fn mail_sender(mut self, sender: Arc<dyn MailSender>) -> Self {
        self.mail_sender = Some(sender);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext {
            travel_request_repo: self
                .travel_request_repo
                .ok_or_else(|| ServiceError::validation("travel_request_repo is required"))?,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            audit_repo: self
                .audit_repo
                .ok_or_else(|| ServiceError::validation("audit_repo is required"))?,
            department_repo: self
                .department_repo
                .ok_or_else(|| ServiceError::validation("department_repo is required"))?,
            project_repo: self
                .project_repo
                .ok_or_else(|| ServiceError::validation("project_repo is required"))?,
            notification_channel: self
                .notification_channel
                .ok_or_else(|| ServiceError::validation("notification_channel is required"))?,
            ticket_renderer: self
                .ticket_renderer
                .ok_or_else(|| ServiceError::validation("ticket_renderer is required"))?,
            mail_sender: self
                .mail_sender
                .ok_or_else(|| ServiceError::validation("mail_sender is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            public_base_url: self
                .public_base_url
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
