//! Statistics service
//!
//! Simple request counts by status, admin-wide or per manager.

use desk_core::value_objects::RequestStatus;
use tracing::instrument;

use crate::dto::{StatisticsResponse, StatusCount};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Statistics service
pub struct StatisticsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatisticsService<'a> {
    /// Create a new StatisticsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Counts across all requests
    #[instrument(skip(self))]
    pub async fn overall(&self) -> ServiceResult<StatisticsResponse> {
        self.collect(None).await
    }

    /// Counts for one manager's reports
    #[instrument(skip(self))]
    pub async fn for_manager(&self, manager_id: i64) -> ServiceResult<StatisticsResponse> {
        self.collect(Some(manager_id)).await
    }

    async fn collect(&self, manager_id: Option<i64>) -> ServiceResult<StatisticsResponse> {
        let repo = self.ctx.travel_request_repo();
        let total_requests = repo.count(None, manager_id).await?;

        let mut by_status = Vec::with_capacity(RequestStatus::ALL.len());
        for status in RequestStatus::ALL {
            let count = repo.count(Some(status), manager_id).await?;
            by_status.push(StatusCount {
                status: status.to_string(),
                count,
            });
        }

        Ok(StatisticsResponse {
            total_requests,
            by_status,
        })
    }
}
