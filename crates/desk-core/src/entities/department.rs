//! Department entity

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub created_by: i64,
    pub is_active: bool,
    pub created_on: DateTime<Utc>,
    pub modified_on: Option<DateTime<Utc>>,
}

impl Department {
    pub fn new(name: String, created_by: i64) -> Self {
        Self {
            id: 0,
            name,
            created_by,
            is_active: true,
            created_on: Utc::now(),
            modified_on: None,
        }
    }
}
