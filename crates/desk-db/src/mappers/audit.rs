//! Audit entry <-> model mapper

use desk_core::entities::{AuditAction, AuditEntry};
use desk_core::error::DomainError;

use crate::models::AuditLogModel;

impl TryFrom<AuditLogModel> for AuditEntry {
    type Error = DomainError;

    fn try_from(model: AuditLogModel) -> Result<Self, Self::Error> {
        let action: AuditAction = model.action_type.parse()?;
        Ok(AuditEntry {
            id: model.id,
            acting_user_id: model.acting_user_id,
            entity_name: model.entity_name,
            entity_id: model.entity_id,
            action,
            changes: model.changes,
            timestamp: model.timestamp,
        })
    }
}
