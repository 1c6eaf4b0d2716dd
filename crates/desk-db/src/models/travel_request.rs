//! Travel request database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the travel_requests table
#[derive(Debug, Clone, FromRow)]
pub struct TravelRequestModel {
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
    /// Workflow status stored as its canonical string form
    pub status: String,
    /// Optimistic concurrency token, bumped on every committed transition
    pub version: i32,
    pub created_on: DateTime<Utc>,
    pub modified_on: Option<DateTime<Utc>>,
    pub is_active: bool,
}
