//! Audit service
//!
//! Paginated read access to the audit trail (admin only at the API layer).

use tracing::instrument;

use crate::dto::{AuditLogResponse, PaginatedResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Audit service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List audit entries, newest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: i64,
        per_page: i64,
    ) -> ServiceResult<PaginatedResponse<AuditLogResponse>> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let offset = (page - 1) * per_page;

        let entries = self.ctx.audit_repo().list(per_page, offset).await?;
        let total = self.ctx.audit_repo().count().await?;

        let data = entries.iter().map(AuditLogResponse::from).collect();
        Ok(PaginatedResponse::new(data, page, per_page, total))
    }
}
