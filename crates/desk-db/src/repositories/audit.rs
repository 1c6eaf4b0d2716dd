//! PostgreSQL implementation of AuditRepository
//!
//! Append-only: there is deliberately no UPDATE or DELETE here.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use desk_core::entities::AuditEntry;
use desk_core::traits::{AuditRepository, RepoResult};

use crate::models::AuditLogModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AuditRepository
#[derive(Clone)]
pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    /// Create a new PgAuditRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PgAuditRepository {
    #[instrument(skip(self, entry), fields(entity = %entry.entity_name, entity_id = entry.entity_id))]
    async fn record(&self, entry: &AuditEntry) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO audit_logs
                (acting_user_id, entity_name, entity_id, action_type, changes, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(entry.acting_user_id)
        .bind(&entry.entity_name)
        .bind(entry.entity_id)
        .bind(entry.action.as_str())
        .bind(&entry.changes)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditLogModel>(
            r"
            SELECT id, acting_user_id, entity_name, entity_id, action_type, changes, timestamp
            FROM audit_logs
            ORDER BY timestamp DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
