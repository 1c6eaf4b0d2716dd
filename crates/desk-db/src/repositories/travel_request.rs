//! PostgreSQL implementation of TravelRequestRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use desk_core::entities::TravelRequest;
use desk_core::error::DomainError;
use desk_core::traits::{RepoResult, TravelRequestRepository};
use desk_core::value_objects::RequestStatus;

use crate::models::TravelRequestModel;

use super::error::{map_db_error, request_not_found};

const SELECT_COLUMNS: &str = r"
    id, requester_id, project_id, department_id, reason_for_travel,
    from_date, to_date, from_location, to_location, comments, ticket_url,
    status, version, created_on, modified_on, is_active
";

/// PostgreSQL implementation of TravelRequestRepository
#[derive(Clone)]
pub struct PgTravelRequestRepository {
    pool: PgPool,
}

impl PgTravelRequestRepository {
    /// Create a new PgTravelRequestRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn rows_to_entities(rows: Vec<TravelRequestModel>) -> RepoResult<Vec<TravelRequest>> {
        rows.into_iter().map(TravelRequest::try_from).collect()
    }
}

#[async_trait]
impl TravelRequestRepository for PgTravelRequestRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<TravelRequest>> {
        let result = sqlx::query_as::<_, TravelRequestModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM travel_requests
            WHERE id = $1 AND is_active = TRUE
            ",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(TravelRequest::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_requester(&self, requester_id: i64) -> RepoResult<Vec<TravelRequest>> {
        let rows = sqlx::query_as::<_, TravelRequestModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM travel_requests
            WHERE requester_id = $1 AND is_active = TRUE
            ORDER BY created_on DESC
            ",
        ))
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::rows_to_entities(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_manager(&self, manager_id: i64) -> RepoResult<Vec<TravelRequest>> {
        let rows = sqlx::query_as::<_, TravelRequestModel>(
            r"
            SELECT tr.id, tr.requester_id, tr.project_id, tr.department_id,
                   tr.reason_for_travel, tr.from_date, tr.to_date,
                   tr.from_location, tr.to_location, tr.comments, tr.ticket_url,
                   tr.status, tr.version, tr.created_on, tr.modified_on, tr.is_active
            FROM travel_requests tr
            JOIN users u ON u.id = tr.requester_id
            WHERE u.manager_id = $1 AND tr.is_active = TRUE
            ORDER BY tr.created_on DESC
            ",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::rows_to_entities(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: RequestStatus) -> RepoResult<Vec<TravelRequest>> {
        let rows = sqlx::query_as::<_, TravelRequestModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM travel_requests
            WHERE status = $1 AND is_active = TRUE
            ORDER BY created_on DESC
            ",
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::rows_to_entities(rows)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<TravelRequest>> {
        let rows = sqlx::query_as::<_, TravelRequestModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM travel_requests
            WHERE is_active = TRUE
            ORDER BY created_on DESC
            ",
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::rows_to_entities(rows)
    }

    #[instrument(skip(self, request))]
    async fn create(&self, request: &TravelRequest) -> RepoResult<TravelRequest> {
        let row = sqlx::query_as::<_, TravelRequestModel>(&format!(
            r"
            INSERT INTO travel_requests
                (requester_id, project_id, department_id, reason_for_travel,
                 from_date, to_date, from_location, to_location, comments,
                 ticket_url, status, version, created_on, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, $12, TRUE)
            RETURNING {SELECT_COLUMNS}
            ",
        ))
        .bind(request.requester_id)
        .bind(request.project_id)
        .bind(request.department_id)
        .bind(&request.reason_for_travel)
        .bind(request.from_date)
        .bind(request.to_date)
        .bind(&request.from_location)
        .bind(&request.to_location)
        .bind(&request.comments)
        .bind(&request.ticket_url)
        .bind(request.status.as_str())
        .bind(request.created_on)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        TravelRequest::try_from(row)
    }

    /// Version-checked read-modify-write commit.
    ///
    /// Only the owning transition may advance the row: the UPDATE is gated
    /// on the version observed at read time, so a concurrent writer that
    /// committed first makes this one fail with `StaleRequest`.
    #[instrument(skip(self, request))]
    async fn commit(&self, request: &TravelRequest, expected_version: i32) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE travel_requests
            SET status = $3, comments = $4, ticket_url = $5,
                modified_on = $6, version = version + 1
            WHERE id = $1 AND version = $2 AND is_active = TRUE
            ",
        )
        .bind(request.id)
        .bind(expected_version)
        .bind(request.status.as_str())
        .bind(&request.comments)
        .bind(&request.ticket_url)
        .bind(request.modified_on)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Distinguish a concurrent update from a vanished row
            let exists = sqlx::query_scalar::<_, bool>(
                r"
                SELECT EXISTS(SELECT 1 FROM travel_requests WHERE id = $1 AND is_active = TRUE)
                ",
            )
            .bind(request.id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

            if exists {
                return Err(DomainError::StaleRequest(request.id));
            }
            return Err(request_not_found(request.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE travel_requests
            SET is_active = FALSE, modified_on = NOW()
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(request_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(
        &self,
        status: Option<RequestStatus>,
        manager_id: Option<i64>,
    ) -> RepoResult<i64> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM travel_requests tr
            JOIN users u ON u.id = tr.requester_id
            WHERE tr.is_active = TRUE
              AND ($1::TEXT IS NULL OR tr.status = $1)
              AND ($2::BIGINT IS NULL OR u.manager_id = $2)
            ",
        )
        .bind(status.map(|s| s.as_str()))
        .bind(manager_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgTravelRequestRepository>();
    }
}
