//! User entity <-> model mapper

use desk_core::entities::User;
use desk_core::error::DomainError;
use desk_core::value_objects::UserRole;

use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role: UserRole = model.role.parse()?;
        Ok(User {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            role,
            department_id: model.department_id,
            manager_id: model.manager_id,
            is_active: model.is_active,
            created_on: model.created_on,
            modified_on: model.modified_on,
        })
    }
}
