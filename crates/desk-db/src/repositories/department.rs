//! PostgreSQL implementation of DepartmentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use desk_core::entities::Department;
use desk_core::traits::{DepartmentRepository, RepoResult};

use crate::models::DepartmentModel;

use super::error::{department_not_found, map_db_error};

/// PostgreSQL implementation of DepartmentRepository
#[derive(Clone)]
pub struct PgDepartmentRepository {
    pool: PgPool,
}

impl PgDepartmentRepository {
    /// Create a new PgDepartmentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for PgDepartmentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Department>> {
        let result = sqlx::query_as::<_, DepartmentModel>(
            r"
            SELECT id, department_name, created_by, is_active, created_on, modified_on
            FROM departments
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Department::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentModel>(
            r"
            SELECT id, department_name, created_by, is_active, created_on, modified_on
            FROM departments
            WHERE is_active = TRUE
            ORDER BY department_name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Department::from).collect())
    }

    #[instrument(skip(self, department))]
    async fn create(&self, department: &Department) -> RepoResult<Department> {
        let row = sqlx::query_as::<_, DepartmentModel>(
            r"
            INSERT INTO departments (department_name, created_by, is_active, created_on)
            VALUES ($1, $2, TRUE, $3)
            RETURNING id, department_name, created_by, is_active, created_on, modified_on
            ",
        )
        .bind(&department.name)
        .bind(department.created_by)
        .bind(department.created_on)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Department::from(row))
    }

    #[instrument(skip(self, department))]
    async fn update(&self, department: &Department) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE departments
            SET department_name = $2, modified_on = NOW()
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(department.id)
        .bind(&department.name)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(department_not_found(department.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE departments
            SET is_active = FALSE, modified_on = NOW()
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(department_not_found(id));
        }

        Ok(())
    }
}
