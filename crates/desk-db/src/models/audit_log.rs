//! Audit log database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for the audit_logs table. Append-only.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: i64,
    pub acting_user_id: i64,
    /// e.g. "TravelRequest", "User"
    pub entity_name: String,
    pub entity_id: i64,
    /// "EntityCreated", "EntityModified", "EntityDeleted"
    pub action_type: String,
    /// JSON array of field-level before/after changes
    pub changes: Option<JsonValue>,
    pub timestamp: DateTime<Utc>,
}
