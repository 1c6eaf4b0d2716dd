//! PostgreSQL implementation of ProjectRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use desk_core::entities::Project;
use desk_core::traits::{ProjectRepository, RepoResult};

use crate::models::ProjectModel;

use super::error::{map_db_error, project_not_found};

/// PostgreSQL implementation of ProjectRepository
#[derive(Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    /// Create a new PgProjectRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Project>> {
        let result = sqlx::query_as::<_, ProjectModel>(
            r"
            SELECT id, project_name, created_by, is_active, created_on, modified_on
            FROM projects
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Project::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectModel>(
            r"
            SELECT id, project_name, created_by, is_active, created_on, modified_on
            FROM projects
            WHERE is_active = TRUE
            ORDER BY project_name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    #[instrument(skip(self, project))]
    async fn create(&self, project: &Project) -> RepoResult<Project> {
        let row = sqlx::query_as::<_, ProjectModel>(
            r"
            INSERT INTO projects (project_name, created_by, is_active, created_on)
            VALUES ($1, $2, TRUE, $3)
            RETURNING id, project_name, created_by, is_active, created_on, modified_on
            ",
        )
        .bind(&project.name)
        .bind(project.created_by)
        .bind(project.created_on)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Project::from(row))
    }

    #[instrument(skip(self, project))]
    async fn update(&self, project: &Project) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE projects
            SET project_name = $2, modified_on = NOW()
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(project.id)
        .bind(&project.name)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(project_not_found(project.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE projects
            SET is_active = FALSE, modified_on = NOW()
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(project_not_found(id));
        }

        Ok(())
    }
}
