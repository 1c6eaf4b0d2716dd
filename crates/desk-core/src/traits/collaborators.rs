//! Collaborator ports consumed by the side-effect dispatcher
//!
//! All three are best effort from the workflow's point of view: the
//! dispatcher logs failures and never lets them veto or reverse a
//! committed transition.

use async_trait::async_trait;

use crate::entities::TicketDetails;
use crate::error::DomainError;
use crate::events::NotificationEvent;
use crate::value_objects::UserRole;

/// Real-time delivery to connected clients
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Deliver to one user
    async fn send_to_user(&self, user_id: i64, event: NotificationEvent)
        -> Result<(), DomainError>;

    /// Deliver to every active user holding a role. Membership is resolved
    /// at dispatch time, not cached.
    async fn send_to_role(&self, role: UserRole, event: NotificationEvent)
        -> Result<(), DomainError>;

    /// Deliver to every active user in a department
    async fn send_to_department(
        &self,
        department_id: i64,
        event: NotificationEvent,
    ) -> Result<(), DomainError>;
}

/// Ticket document rendering
#[async_trait]
pub trait TicketRenderer: Send + Sync {
    /// Render the booking confirmation PDF for a committed request snapshot
    async fn render_ticket(&self, details: &TicketDetails) -> Result<Vec<u8>, DomainError>;
}

/// Outbound email delivery
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send an HTML email
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), DomainError>;

    /// Send an HTML email with a single attachment
    async fn send_with_attachment(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        attachment: Vec<u8>,
        filename: &str,
    ) -> Result<(), DomainError>;
}
