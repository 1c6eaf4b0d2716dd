//! Side-effect dispatcher
//!
//! After a committed transition, performs in order: audit recording,
//! notification delivery, and (for bookings) document generation + email.
//! Each step is independently fault-isolated: a failure is logged with the
//! request id, step name, and actor, and never blocks the next step or
//! reaches the caller of the transition.

use desk_core::entities::{AuditEntry, FieldChange, TicketDetails, TravelRequest, User};
use desk_core::events::{status_title, NotificationEvent, NotificationTarget};
use desk_core::value_objects::{RequestStatus, UserRole};
use desk_core::workflow::Actor;
use serde_json::json;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;

/// Fixed subject of the booking confirmation email
pub const BOOKING_EMAIL_SUBJECT: &str = "Your Ticket has been Booked!";

/// Everything the dispatcher needs about a committed transition
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The committed snapshot
    pub request: TravelRequest,
    pub previous_status: RequestStatus,
    pub actor: Actor,
    /// The employee who owns the request
    pub requester: User,
    /// Field-level diff captured for the audit entry
    pub changes: Vec<FieldChange>,
}

/// Dispatcher for post-commit side effects
pub struct SideEffectDispatcher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SideEffectDispatcher<'a> {
    /// Create a new SideEffectDispatcher
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run all side effects for one committed transition, in order.
    #[instrument(skip(self, outcome), fields(request_id = outcome.request.id, actor_id = outcome.actor.id))]
    pub async fn dispatch(&self, outcome: &TransitionOutcome) {
        self.record_audit(outcome).await;
        self.notify(outcome).await;
        if outcome.request.status == RequestStatus::Booked {
            self.send_ticket(outcome).await;
        }
    }

    /// Step 1: append the audit entry
    async fn record_audit(&self, outcome: &TransitionOutcome) {
        let entry = AuditEntry::modified(
            outcome.actor.id,
            "TravelRequest",
            outcome.request.id,
            &outcome.changes,
        );

        if let Err(e) = self.ctx.audit_repo().record(&entry).await {
            warn!(
                request_id = outcome.request.id,
                actor_id = outcome.actor.id,
                step = "audit",
                error = %e,
                "Side effect failed"
            );
        }
    }

    /// Step 2: notify the requester; on approval also notify the travel
    /// admins that a request is waiting for booking
    async fn notify(&self, outcome: &TransitionOutcome) {
        let request = &outcome.request;
        let status = request.status;

        let message = match status {
            RequestStatus::Approved => format!(
                "Your travel request #{} to {} has been approved",
                request.id, request.to_location
            ),
            RequestStatus::Rejected => format!(
                "Your travel request #{} to {} has been rejected",
                request.id, request.to_location
            ),
            RequestStatus::Booked => format!(
                "Your travel to {} has been booked",
                request.to_location
            ),
            RequestStatus::Completed => format!(
                "Your travel request #{} to {} has been completed",
                request.id, request.to_location
            ),
            RequestStatus::ReturnedToManager | RequestStatus::ReturnedToEmployee => format!(
                "Your travel request #{} to {} has been returned for revision",
                request.id, request.to_location
            ),
            _ => format!("Your travel request #{} has been updated", request.id),
        };

        let data = json!({
            "request_id": request.id,
            "status": status.as_str(),
            "destination": request.to_location,
        });

        let event = NotificationEvent::new(
            "travel_request",
            status_title(status),
            message,
            NotificationTarget::User {
                user_id: outcome.requester.id,
            },
        )
        .with_data(data.clone())
        .with_action_url(format!("/employee/requests/{}", request.id));

        if let Err(e) = self
            .ctx
            .notification_channel()
            .send_to_user(outcome.requester.id, event)
            .await
        {
            warn!(
                request_id = request.id,
                actor_id = outcome.actor.id,
                step = "notification",
                error = %e,
                "Side effect failed"
            );
        }

        // Approval puts the request in the travel admins' queue
        if status == RequestStatus::Approved {
            let event = NotificationEvent::new(
                "travel_request",
                "New Request for Booking",
                format!(
                    "Travel request #{} by {} needs booking",
                    request.id,
                    outcome.requester.full_name()
                ),
                NotificationTarget::Role {
                    role: UserRole::TravelAdmin,
                },
            )
            .with_data(data);

            if let Err(e) = self
                .ctx
                .notification_channel()
                .send_to_role(UserRole::TravelAdmin, event)
                .await
            {
                warn!(
                    request_id = request.id,
                    actor_id = outcome.actor.id,
                    step = "notification",
                    error = %e,
                    "Side effect failed"
                );
            }
        }
    }

    /// Step 3 (Booked only): render the ticket PDF and email it to the
    /// requester. A render failure degrades to sending the email without
    /// the attachment; the booking itself stays committed either way.
    async fn send_ticket(&self, outcome: &TransitionOutcome) {
        let request = &outcome.request;
        let details = self.ticket_details(outcome).await;
        let body = booking_email_body(&details);

        let attachment = match self.ctx.ticket_renderer().render_ticket(&details).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(
                    request_id = request.id,
                    actor_id = outcome.actor.id,
                    step = "render",
                    error = %e,
                    "Ticket render failed, sending email without attachment"
                );
                None
            }
        };

        let result = match attachment {
            Some(bytes) => {
                self.ctx
                    .mail_sender()
                    .send_with_attachment(
                        &outcome.requester.email,
                        BOOKING_EMAIL_SUBJECT,
                        &body,
                        bytes,
                        &format!("TravelTicket_{}.pdf", request.id),
                    )
                    .await
            }
            None => {
                self.ctx
                    .mail_sender()
                    .send(&outcome.requester.email, BOOKING_EMAIL_SUBJECT, &body)
                    .await
            }
        };

        match result {
            Ok(()) => info!(request_id = request.id, "Booking confirmation email sent"),
            Err(e) => warn!(
                request_id = request.id,
                actor_id = outcome.actor.id,
                step = "mail",
                error = %e,
                "Side effect failed"
            ),
        }
    }

    /// Assemble the renderer snapshot; name lookups are best effort
    async fn ticket_details(&self, outcome: &TransitionOutcome) -> TicketDetails {
        let request = &outcome.request;

        let project_name = match self.ctx.project_repo().find_by_id(request.project_id).await {
            Ok(Some(project)) => project.name,
            _ => String::new(),
        };
        let department_name = match self
            .ctx
            .department_repo()
            .find_by_id(request.department_id)
            .await
        {
            Ok(Some(department)) => department.name,
            _ => String::new(),
        };

        TicketDetails {
            request_id: request.id,
            traveler_name: outcome.requester.full_name(),
            traveler_email: outcome.requester.email.clone(),
            project_name,
            department_name,
            from_location: request.from_location.clone(),
            to_location: request.to_location.clone(),
            from_date: request.from_date,
            to_date: request.to_date,
            reason_for_travel: request.reason_for_travel.clone(),
            download_url: request
                .ticket_url
                .clone()
                .unwrap_or_else(|| self.ctx.ticket_download_url(request.id)),
        }
    }
}

/// HTML body of the booking confirmation email
pub fn booking_email_body(details: &TicketDetails) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 650px; margin: 0 auto;">
<h1>Booking Confirmation</h1>
<p>Your ticket has been successfully booked!</p>
<h2>Your Travel Information</h2>
<p><strong>From:</strong> {from_location}</p>
<p><strong>To:</strong> {to_location}</p>
<p><strong>Departure:</strong> {from_date}</p>
<p><strong>Return:</strong> {to_date}</p>
<p><strong>Traveler Name:</strong> {traveler}</p>
<p><strong>Reason for Travel:</strong> {reason}</p>
<p><a href="{download_url}">Download Your Ticket</a></p>
<p>Thank you for choosing us for your travel needs!</p>
</div>"#,
        from_location = details.from_location,
        to_location = details.to_location,
        from_date = details.from_date.format("%Y-%m-%d"),
        to_date = details.to_date.format("%Y-%m-%d"),
        traveler = details.traveler_name,
        reason = details.reason_for_travel,
        download_url = details.download_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_booking_email_body_contains_itinerary() {
        let details = TicketDetails {
            request_id: 42,
            traveler_name: "Asha Verma".to_string(),
            traveler_email: "asha@corp.example".to_string(),
            project_name: "Apollo".to_string(),
            department_name: "Engineering".to_string(),
            from_location: "Pune".to_string(),
            to_location: "Berlin".to_string(),
            from_date: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            to_date: Utc.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap(),
            reason_for_travel: "Client onboarding".to_string(),
            download_url: "http://localhost:8080/api/v1/travel-requests/42/ticket".to_string(),
        };

        let body = booking_email_body(&details);
        assert!(body.contains("Pune"));
        assert!(body.contains("Berlin"));
        assert!(body.contains("2025-03-10"));
        assert!(body.contains("Asha Verma"));
        assert!(body.contains("/travel-requests/42/ticket"));
    }
}
