//! Workflow service - the single write path for travel request status
//!
//! Validates and applies a requested state change: existence, legal edge,
//! actor authorization, required input, then a version-checked commit.
//! Side effects (audit, notification, document + mail) run strictly after
//! the commit and can never revert it.

use desk_core::entities::{FieldChange, TravelRequest};
use desk_core::error::DomainError;
use desk_core::value_objects::RequestStatus;
use desk_core::workflow::{find_edge, Actor};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::dispatch::{SideEffectDispatcher, TransitionOutcome};
use super::error::ServiceResult;

/// Caller-supplied input for a transition
#[derive(Debug, Clone, Default)]
pub struct TransitionInput {
    pub comments: Option<String>,
    pub ticket_url: Option<String>,
}

impl TransitionInput {
    /// Input with comments only
    pub fn with_comments(comments: impl Into<String>) -> Self {
        Self {
            comments: Some(comments.into()),
            ticket_url: None,
        }
    }

    fn trimmed_comments(&self) -> Option<String> {
        self.comments
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    fn trimmed_ticket_url(&self) -> Option<String> {
        self.ticket_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}

/// Workflow service applying status transitions
pub struct WorkflowService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WorkflowService<'a> {
    /// Create a new WorkflowService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply a status transition to a travel request.
    ///
    /// Validation order: request exists → edge exists → actor authorized →
    /// required input present. Re-applying a transition whose target equals
    /// the stored status is an idempotent no-op: the stored entity is
    /// returned unchanged and no side effects fire, so client retries never
    /// duplicate audit entries.
    ///
    /// On success the updated entity is returned; a concurrent writer that
    /// committed first surfaces as a `StaleRequest` conflict the caller may
    /// retry against fresh state.
    #[instrument(skip(self, input), fields(actor_id = actor.id, role = %actor.role))]
    pub async fn transition(
        &self,
        request_id: i64,
        target: RequestStatus,
        actor: Actor,
        input: TransitionInput,
    ) -> ServiceResult<TravelRequest> {
        let request = self
            .ctx
            .travel_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::RequestNotFound(request_id))?;

        if request.status == target {
            debug!(request_id, status = %target, "Transition retry is a no-op");
            return Ok(request);
        }

        let edge = find_edge(request.status, target).ok_or(DomainError::InvalidTransition {
            from: request.status,
            to: target,
        })?;

        let requester = self
            .ctx
            .user_repo()
            .find_by_id(request.requester_id)
            .await?
            .ok_or(DomainError::UserNotFound(request.requester_id))?;

        edge.authorize(&actor, requester.id, requester.manager_id)?;

        let comments = input.trimmed_comments();
        if edge.requires_comments && comments.is_none() {
            return Err(DomainError::MissingComments.into());
        }

        // Booked needs a ticket reference: either the caller's URL or the
        // canonical download path for the rendered document
        let ticket_url = if target == RequestStatus::Booked {
            Some(
                input
                    .trimmed_ticket_url()
                    .unwrap_or_else(|| self.ctx.ticket_download_url(request_id)),
            )
        } else {
            None
        };

        let previous = request.clone();
        let mut updated = request;
        updated.apply_transition(target, comments, ticket_url);

        self.ctx
            .travel_request_repo()
            .commit(&updated, previous.version)
            .await?;
        updated.version = previous.version + 1;

        info!(
            request_id,
            from = %previous.status,
            to = %target,
            "Travel request transition committed"
        );

        // Side effects are queued after the commit; their failures are
        // logged inside the dispatcher and never reach the caller.
        let outcome = TransitionOutcome {
            request: updated.clone(),
            previous_status: previous.status,
            actor,
            requester,
            changes: Self::diff(&previous, &updated),
        };
        SideEffectDispatcher::new(self.ctx).dispatch(&outcome).await;

        Ok(updated)
    }

    /// Field-level diff of the workflow-mutable fields
    fn diff(previous: &TravelRequest, updated: &TravelRequest) -> Vec<FieldChange> {
        [
            FieldChange::new(
                "status",
                Some(previous.status.to_string()),
                Some(updated.status.to_string()),
            ),
            FieldChange::new("comments", previous.comments.clone(), updated.comments.clone()),
            FieldChange::new(
                "ticket_url",
                previous.ticket_url.clone(),
                updated.ticket_url.clone(),
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
