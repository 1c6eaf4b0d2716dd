//! User entity

use chrono::{DateTime, Utc};

use crate::value_objects::UserRole;

/// A user account: employee, manager, travel admin, or admin.
///
/// `manager_id` points at the manager who approves this user's travel
/// requests. It is resolved through the requester, never through the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub department_id: i64,
    pub manager_id: Option<i64>,
    pub is_active: bool,
    pub created_on: DateTime<Utc>,
    pub modified_on: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        role: UserRole,
        department_id: i64,
        manager_id: Option<i64>,
    ) -> Self {
        Self {
            id: 0,
            first_name,
            last_name,
            email,
            role,
            department_id,
            manager_id,
            is_active: true,
            created_on: Utc::now(),
            modified_on: None,
        }
    }

    /// Display name: "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[inline]
    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }
}
