//! User service
//!
//! Admin-driven user management with the same side-effect contract as the
//! workflow: every mutation audits and attempts one notification.

use desk_common::auth::{hash_password, validate_password_strength};
use desk_core::entities::{AuditEntry, FieldChange, User};
use desk_core::error::DomainError;
use desk_core::events::{NotificationEvent, NotificationTarget};
use desk_core::value_objects::UserRole;
use desk_core::workflow::Actor;
use tracing::{info, instrument, warn};

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new user account
    #[instrument(skip(self, request), fields(actor_id = actor.id, email = %request.email))]
    pub async fn create(
        &self,
        actor: Actor,
        request: CreateUserRequest,
    ) -> ServiceResult<UserResponse> {
        validate_password_strength(&request.password).map_err(ServiceError::from)?;

        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let role: UserRole = request.role.parse()?;

        let department = self
            .ctx
            .department_repo()
            .find_by_id(request.department_id)
            .await?
            .ok_or(DomainError::DepartmentNotFound(request.department_id))?;

        if let Some(manager_id) = request.manager_id {
            let manager = self
                .ctx
                .user_repo()
                .find_by_id(manager_id)
                .await?
                .ok_or(DomainError::UserNotFound(manager_id))?;
            if !manager.is_manager() {
                return Err(ServiceError::validation("manager_id must reference a manager"));
            }
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        let user = User::new(
            request.first_name,
            request.last_name,
            request.email,
            role,
            department.id,
            request.manager_id,
        );
        let created = self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = created.id, role = %created.role, "User created");

        let entry = AuditEntry::created(actor.id, "User", created.id);
        if let Err(e) = self.ctx.audit_repo().record(&entry).await {
            warn!(user_id = created.id, step = "audit", error = %e, "Side effect failed");
        }

        let event = NotificationEvent::new(
            "user_management",
            "Account Created",
            "Your TravelDesk account has been created",
            NotificationTarget::User { user_id: created.id },
        );
        if let Err(e) = self
            .ctx
            .notification_channel()
            .send_to_user(created.id, event)
            .await
        {
            warn!(user_id = created.id, step = "notification", error = %e, "Side effect failed");
        }

        Ok(UserResponse::from(&created))
    }

    /// Update an existing user
    #[instrument(skip(self, request), fields(actor_id = actor.id))]
    pub async fn update(
        &self,
        actor: Actor,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        let previous = user.clone();

        if let Some(first_name) = request.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name;
        }
        if let Some(role) = request.role {
            user.role = role.parse()?;
        }
        if let Some(department_id) = request.department_id {
            self.ctx
                .department_repo()
                .find_by_id(department_id)
                .await?
                .ok_or(DomainError::DepartmentNotFound(department_id))?;
            user.department_id = department_id;
        }
        if let Some(manager_id) = request.manager_id {
            self.ctx
                .user_repo()
                .find_by_id(manager_id)
                .await?
                .ok_or(DomainError::UserNotFound(manager_id))?;
            user.manager_id = Some(manager_id);
        }

        self.ctx.user_repo().update(&user).await?;

        info!(user_id, "User updated");

        let changes: Vec<FieldChange> = [
            FieldChange::new(
                "first_name",
                Some(previous.first_name.clone()),
                Some(user.first_name.clone()),
            ),
            FieldChange::new(
                "last_name",
                Some(previous.last_name.clone()),
                Some(user.last_name.clone()),
            ),
            FieldChange::new(
                "role",
                Some(previous.role.to_string()),
                Some(user.role.to_string()),
            ),
            FieldChange::new(
                "department_id",
                Some(previous.department_id.to_string()),
                Some(user.department_id.to_string()),
            ),
            FieldChange::new(
                "manager_id",
                previous.manager_id.map(|id| id.to_string()),
                user.manager_id.map(|id| id.to_string()),
            ),
        ]
        .into_iter()
        .flatten()
        .collect();

        let entry = AuditEntry::modified(actor.id, "User", user_id, &changes);
        if let Err(e) = self.ctx.audit_repo().record(&entry).await {
            warn!(user_id, step = "audit", error = %e, "Side effect failed");
        }

        let role_changed = previous.role != user.role;
        let event = NotificationEvent::new(
            "user_management",
            if role_changed { "Role Changed" } else { "Account Updated" },
            if role_changed {
                "Your role has been changed"
            } else {
                "Your account information has been updated"
            },
            NotificationTarget::User { user_id },
        );
        if let Err(e) = self
            .ctx
            .notification_channel()
            .send_to_user(user_id, event)
            .await
        {
            warn!(user_id, step = "notification", error = %e, "Side effect failed");
        }

        Ok(UserResponse::from(&user))
    }

    /// Soft-deactivate a user
    #[instrument(skip(self), fields(actor_id = actor.id))]
    pub async fn deactivate(&self, actor: Actor, user_id: i64) -> ServiceResult<()> {
        self.ctx.user_repo().deactivate(user_id).await?;

        info!(user_id, "User deactivated");

        let entry = AuditEntry::deleted(actor.id, "User", user_id);
        if let Err(e) = self.ctx.audit_repo().record(&entry).await {
            warn!(user_id, step = "audit", error = %e, "Side effect failed");
        }

        Ok(())
    }

    /// Get one user
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: i64) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        Ok(UserResponse::from(&user))
    }

    /// List all active users
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().find_all().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    /// List a manager's active reports
    #[instrument(skip(self))]
    pub async fn team_members(&self, manager_id: i64) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().find_by_manager(manager_id).await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }
}
