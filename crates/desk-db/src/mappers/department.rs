//! Department entity <-> model mapper

use desk_core::entities::Department;

use crate::models::DepartmentModel;

impl From<DepartmentModel> for Department {
    fn from(model: DepartmentModel) -> Self {
        Department {
            id: model.id,
            name: model.department_name,
            created_by: model.created_by,
            is_active: model.is_active,
            created_on: model.created_on,
            modified_on: model.modified_on,
        }
    }
}
