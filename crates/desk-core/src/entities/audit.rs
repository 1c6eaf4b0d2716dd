//! Audit entry - append-only record of entity mutations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of mutation captured by an audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    EntityCreated,
    EntityModified,
    EntityDeleted,
}

impl AuditAction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityCreated => "EntityCreated",
            Self::EntityModified => "EntityModified",
            Self::EntityDeleted => "EntityDeleted",
        }
    }
}

impl std::str::FromStr for AuditAction {
    type Err = crate::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EntityCreated" => Ok(Self::EntityCreated),
            "EntityModified" => Ok(Self::EntityModified),
            "EntityDeleted" => Ok(Self::EntityDeleted),
            other => Err(crate::error::DomainError::ValidationError(format!(
                "Unknown audit action: {other}"
            ))),
        }
    }
}

/// A single field-level before/after change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl FieldChange {
    pub fn new(
        field: impl Into<String>,
        from: Option<String>,
        to: Option<String>,
    ) -> Option<Self> {
        if from == to {
            return None;
        }
        Some(Self {
            field: field.into(),
            from,
            to,
        })
    }
}

/// Append-only audit record. Never mutated or deleted once written.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub acting_user_id: i64,
    pub entity_name: String,
    pub entity_id: i64,
    pub action: AuditAction,
    pub changes: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Build an entry for a modification, with a serialized field diff.
    pub fn modified(
        acting_user_id: i64,
        entity_name: impl Into<String>,
        entity_id: i64,
        changes: &[FieldChange],
    ) -> Self {
        Self {
            id: 0,
            acting_user_id,
            entity_name: entity_name.into(),
            entity_id,
            action: AuditAction::EntityModified,
            changes: serde_json::to_value(changes).ok(),
            timestamp: Utc::now(),
        }
    }

    /// Build an entry for a creation (no diff payload).
    pub fn created(acting_user_id: i64, entity_name: impl Into<String>, entity_id: i64) -> Self {
        Self {
            id: 0,
            acting_user_id,
            entity_name: entity_name.into(),
            entity_id,
            action: AuditAction::EntityCreated,
            changes: None,
            timestamp: Utc::now(),
        }
    }

    /// Build an entry for a (soft) deletion.
    pub fn deleted(acting_user_id: i64, entity_name: impl Into<String>, entity_id: i64) -> Self {
        Self {
            id: 0,
            acting_user_id,
            entity_name: entity_name.into(),
            entity_id,
            action: AuditAction::EntityDeleted,
            changes: None,
            timestamp: Utc::now(),
        }
    }
}
