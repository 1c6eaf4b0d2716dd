//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use desk_core::entities::User;
use desk_core::error::DomainError;
use desk_core::traits::{RepoResult, UserRepository};
use desk_core::value_objects::UserRole;

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_not_found};

const SELECT_COLUMNS: &str = r"
    id, first_name, last_name, email, password_hash, role,
    department_id, manager_id, is_active, created_on, modified_on
";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn rows_to_entities(rows: Vec<UserModel>) -> RepoResult<Vec<User>> {
        rows.into_iter().map(User::try_from).collect()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM users
            WHERE id = $1 AND is_active = TRUE
            ",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM users
            WHERE email = $1 AND is_active = TRUE
            ",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_role(&self, role: UserRole) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM users
            WHERE role = $1 AND is_active = TRUE
            ",
        ))
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::rows_to_entities(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_department(&self, department_id: i64) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM users
            WHERE department_id = $1 AND is_active = TRUE
            ",
        ))
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::rows_to_entities(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_manager(&self, manager_id: i64) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM users
            WHERE manager_id = $1 AND is_active = TRUE
            ",
        ))
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::rows_to_entities(rows)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(&format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM users
            WHERE is_active = TRUE
            ORDER BY id
            ",
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::rows_to_entities(rows)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND is_active = TRUE)
            ",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, user, password_hash))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User> {
        let row = sqlx::query_as::<_, UserModel>(&format!(
            r"
            INSERT INTO users
                (first_name, last_name, email, password_hash, role,
                 department_id, manager_id, is_active, created_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)
            RETURNING {SELECT_COLUMNS}
            ",
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(user.department_id)
        .bind(user.manager_id)
        .bind(user.created_on)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        User::try_from(row)
    }

    #[instrument(skip(self, user))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET first_name = $2, last_name = $3, role = $4,
                department_id = $5, manager_id = $6, modified_on = NOW()
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(user.department_id)
        .bind(user.manager_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET is_active = FALSE, modified_on = NOW()
            WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM users WHERE id = $1 AND is_active = TRUE
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
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
        assert_send_sync::<PgUserRepository>();
    }
}
