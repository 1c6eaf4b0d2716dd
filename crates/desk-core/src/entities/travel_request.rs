//! Travel request entity - the only entity with lifecycle logic

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::RequestStatus;

/// A travel request owned by the employee who filed it.
///
/// Mutated exclusively through the workflow engine; rows are never
/// physically deleted (soft deactivation only). The `version` field is the
/// optimistic concurrency token checked at commit time.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelRequest {
    pub id: i64,
    pub requester_id: i64,
    pub project_id: i64,
    pub department_id: i64,
    pub reason_for_travel: String,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub from_location: String,
    pub to_location: String,
    pub comments: Option<String>,
    pub ticket_url: Option<String>,
    pub status: RequestStatus,
    pub version: i32,
    pub created_on: DateTime<Utc>,
    pub modified_on: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl TravelRequest {
    /// Create a new request in `Pending` for the given requester.
    ///
    /// # Errors
    /// Returns `InvalidDateRange` if the itinerary ends before it starts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requester_id: i64,
        project_id: i64,
        department_id: i64,
        reason_for_travel: String,
        from_date: DateTime<Utc>,
        to_date: DateTime<Utc>,
        from_location: String,
        to_location: String,
    ) -> Result<Self, DomainError> {
        if from_date > to_date {
            return Err(DomainError::InvalidDateRange);
        }

        Ok(Self {
            id: 0, // assigned by the store on insert
            requester_id,
            project_id,
            department_id,
            reason_for_travel,
            from_date,
            to_date,
            from_location,
            to_location,
            comments: None,
            ticket_url: None,
            status: RequestStatus::Pending,
            version: 0,
            created_on: Utc::now(),
            modified_on: None,
            is_active: true,
        })
    }

    /// Apply a committed status change to this snapshot.
    ///
    /// Sets the status, overwrites comments when provided, records the
    /// ticket reference only when moving into `Booked`, and stamps
    /// `modified_on`. The version is bumped by the store at commit.
    pub fn apply_transition(
        &mut self,
        target: RequestStatus,
        comments: Option<String>,
        ticket_url: Option<String>,
    ) {
        self.status = target;
        if let Some(comments) = comments {
            self.comments = Some(comments);
        }
        if target == RequestStatus::Booked {
            if let Some(url) = ticket_url {
                self.ticket_url = Some(url);
            }
        }
        self.modified_on = Some(Utc::now());
    }

    /// Number of itinerary days, inclusive
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.to_date.date_naive() - self.from_date.date_naive()).num_days() + 1
    }
}

/// Snapshot handed to the document renderer and the booking email.
///
/// Flattened from the request plus the lookups (requester, project,
/// department) the renderer would otherwise have to perform itself.
#[derive(Debug, Clone)]
pub struct TicketDetails {
    pub request_id: i64,
    pub traveler_name: String,
    pub traveler_email: String,
    pub project_name: String,
    pub department_name: String,
    pub from_location: String,
    pub to_location: String,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub reason_for_travel: String,
    pub download_url: String,
}
