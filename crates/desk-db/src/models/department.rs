//! Department database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the departments table
#[derive(Debug, Clone, FromRow)]
pub struct DepartmentModel {
    pub id: i64,
    pub department_name: String,
    pub created_by: i64,
    pub is_active: bool,
    pub created_on: DateTime<Utc>,
    pub modified_on: Option<DateTime<Utc>>,
}
