//! Travel request entity <-> model mapper

use desk_core::entities::TravelRequest;
use desk_core::error::DomainError;
use desk_core::value_objects::RequestStatus;

use crate::models::TravelRequestModel;

impl TryFrom<TravelRequestModel> for TravelRequest {
    type Error = DomainError;

    fn try_from(model: TravelRequestModel) -> Result<Self, Self::Error> {
        let status: RequestStatus = model.status.parse()?;
        Ok(TravelRequest {
            id: model.id,
            requester_id: model.requester_id,
            project_id: model.project_id,
            department_id: model.department_id,
            reason_for_travel: model.reason_for_travel,
            from_date: model.from_date,
            to_date: model.to_date,
            from_location: model.from_location,
            to_location: model.to_location,
            comments: model.comments,
            ticket_url: model.ticket_url,
            status,
            version: model.version,
            created_on: model.created_on,
            modified_on: model.modified_on,
            is_active: model.is_active,
        })
    }
}
