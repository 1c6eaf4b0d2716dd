//! Project entity <-> model mapper

use desk_core::entities::Project;

use crate::models::ProjectModel;

impl From<ProjectModel> for Project {
    fn from(model: ProjectModel) -> Self {
        Project {
            id: model.id,
            name: model.project_name,
            created_by: model.created_by,
            is_active: model.is_active,
            created_on: model.created_on,
            modified_on: model.modified_on,
        }
    }
}
