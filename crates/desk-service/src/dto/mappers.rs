//! Entity to response DTO mappers

use desk_core::entities::{AuditEntry, Department, Project, TravelRequest, User};

use super::responses::{
    AuditLogResponse, DepartmentResponse, ProjectResponse, TravelRequestResponse, UserResponse,
    UserSummary,
};

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            department_id: user.department_id,
            manager_id: user.manager_id,
            created_on: user.created_on,
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

impl TravelRequestResponse {
    /// Build a response from a request plus its requester
    pub fn from_entities(request: &TravelRequest, requester: &User) -> Self {
        Self {
            id: request.id,
            requester: UserSummary::from(requester),
            project_id: request.project_id,
            department_id: request.department_id,
            reason_for_travel: request.reason_for_travel.clone(),
            from_date: request.from_date,
            to_date: request.to_date,
            from_location: request.from_location.clone(),
            to_location: request.to_location.clone(),
            status: request.status.to_string(),
            comments: request.comments.clone(),
            ticket_url: request.ticket_url.clone(),
            created_on: request.created_on,
            modified_on: request.modified_on,
        }
    }
}

impl From<&Department> for DepartmentResponse {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id,
            department_name: department.name.clone(),
            created_on: department.created_on,
        }
    }
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            project_name: project.name.clone(),
            created_on: project.created_on,
        }
    }
}

impl From<&AuditEntry> for AuditLogResponse {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            id: entry.id,
            acting_user_id: entry.acting_user_id,
            entity_name: entry.entity_name.clone(),
            entity_id: entry.entity_id,
            action_type: entry.action.as_str().to_string(),
            changes: entry.changes.clone(),
            timestamp: entry.timestamp,
        }
    }
}
