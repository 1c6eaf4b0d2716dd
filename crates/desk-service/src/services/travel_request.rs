//! Travel request service
//!
//! Creation and read paths for travel requests. Status changes never
//! happen here; they go through the workflow service.

use desk_core::entities::{AuditEntry, TravelRequest};
use desk_core::error::DomainError;
use desk_core::events::{NotificationEvent, NotificationTarget};
use desk_core::value_objects::RequestStatus;
use desk_core::workflow::Actor;
use tracing::{info, instrument, warn};

use crate::dto::{CreateTravelRequestRequest, TravelRequestResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Travel request service
pub struct TravelRequestService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TravelRequestService<'a> {
    /// Create a new TravelRequestService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// File a new travel request for the acting employee.
    ///
    /// The request starts in `Pending`. Creation audits as EntityCreated
    /// and notifies the assigned manager that a request awaits review.
    #[instrument(skip(self, request), fields(actor_id = actor.id))]
    pub async fn create(
        &self,
        actor: Actor,
        request: CreateTravelRequestRequest,
    ) -> ServiceResult<TravelRequestResponse> {
        let requester = self
            .ctx
            .user_repo()
            .find_by_id(actor.id)
            .await?
            .ok_or(DomainError::UserNotFound(actor.id))?;

        let project = self
            .ctx
            .project_repo()
            .find_by_id(request.project_id)
            .await?
            .ok_or(DomainError::ProjectNotFound(request.project_id))?;

        let entity = TravelRequest::new(
            requester.id,
            project.id,
            requester.department_id,
            request.reason_for_travel,
            request.from_date,
            request.to_date,
            request.from_location,
            request.to_location,
        )?;

        let created = self.ctx.travel_request_repo().create(&entity).await?;

        info!(request_id = created.id, requester_id = requester.id, "Travel request filed");

        // Same side-effect contract as transitions: one audit entry, one
        // notification attempt, neither able to undo the insert
        let entry = AuditEntry::created(actor.id, "TravelRequest", created.id);
        if let Err(e) = self.ctx.audit_repo().record(&entry).await {
            warn!(request_id = created.id, step = "audit", error = %e, "Side effect failed");
        }

        if let Some(manager_id) = requester.manager_id {
            let event = NotificationEvent::new(
                "travel_request",
                "New Travel Request",
                format!(
                    "Travel request #{} by {} awaits your review",
                    created.id,
                    requester.full_name()
                ),
                NotificationTarget::User { user_id: manager_id },
            )
            .with_action_url(format!("/manager/requests/{}", created.id));

            if let Err(e) = self
                .ctx
                .notification_channel()
                .send_to_user(manager_id, event)
                .await
            {
                warn!(request_id = created.id, step = "notification", error = %e, "Side effect failed");
            }
        }

        Ok(TravelRequestResponse::from_entities(&created, &requester))
    }

    /// Get one request by id
    #[instrument(skip(self))]
    pub async fn get(&self, request_id: i64) -> ServiceResult<TravelRequestResponse> {
        let request = self
            .ctx
            .travel_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::RequestNotFound(request_id))?;

        self.to_response(request).await
    }

    /// List the acting user's own requests
    #[instrument(skip(self))]
    pub async fn list_for_requester(
        &self,
        requester_id: i64,
    ) -> ServiceResult<Vec<TravelRequestResponse>> {
        let requests = self
            .ctx
            .travel_request_repo()
            .find_by_requester(requester_id)
            .await?;
        self.to_responses(requests).await
    }

    /// List requests filed by a manager's reports
    #[instrument(skip(self))]
    pub async fn list_for_manager(
        &self,
        manager_id: i64,
    ) -> ServiceResult<Vec<TravelRequestResponse>> {
        let requests = self
            .ctx
            .travel_request_repo()
            .find_by_manager(manager_id)
            .await?;
        self.to_responses(requests).await
    }

    /// List requests pending this manager's review
    #[instrument(skip(self))]
    pub async fn list_pending_for_manager(
        &self,
        manager_id: i64,
    ) -> ServiceResult<Vec<TravelRequestResponse>> {
        let requests = self
            .ctx
            .travel_request_repo()
            .find_by_manager(manager_id)
            .await?;
        let pending = requests
            .into_iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .collect();
        self.to_responses(pending).await
    }

    /// List every active request (travel admin view)
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ServiceResult<Vec<TravelRequestResponse>> {
        let requests = self.ctx.travel_request_repo().find_all().await?;
        self.to_responses(requests).await
    }

    /// List requests in a given status (travel admin view)
    #[instrument(skip(self))]
    pub async fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> ServiceResult<Vec<TravelRequestResponse>> {
        let requests = self.ctx.travel_request_repo().find_by_status(status).await?;
        self.to_responses(requests).await
    }

    async fn to_response(&self, request: TravelRequest) -> ServiceResult<TravelRequestResponse> {
        let requester = self
            .ctx
            .user_repo()
            .find_by_id(request.requester_id)
            .await?
            .ok_or(DomainError::UserNotFound(request.requester_id))?;
        Ok(TravelRequestResponse::from_entities(&request, &requester))
    }

    async fn to_responses(
        &self,
        requests: Vec<TravelRequest>,
    ) -> ServiceResult<Vec<TravelRequestResponse>> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.to_response(request).await?);
        }
        Ok(responses)
    }

    /// Authorization guard for the single-request read: the requester, their
    /// assigned manager, a travel admin, or an admin may view it.
    pub async fn authorize_read(&self, request_id: i64, actor: Actor) -> ServiceResult<()> {
        use desk_core::value_objects::UserRole;

        if matches!(actor.role, UserRole::TravelAdmin | UserRole::Admin) {
            return Ok(());
        }

        let request = self
            .ctx
            .travel_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::RequestNotFound(request_id))?;

        if request.requester_id == actor.id {
            return Ok(());
        }

        let requester = self
            .ctx
            .user_repo()
            .find_by_id(request.requester_id)
            .await?
            .ok_or(DomainError::UserNotFound(request.requester_id))?;

        if actor.role == UserRole::Manager && requester.manager_id == Some(actor.id) {
            return Ok(());
        }

        Err(ServiceError::forbidden(
            "Not allowed to view this travel request",
        ))
    }
}
