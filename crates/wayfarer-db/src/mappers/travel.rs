//! Travel plan / request model -> entity mappers

use wayfarer_core::entities::{TravelPlan, TravelPlanStatus, TravelRequest, TravelRequestStatus};
use wayfarer_core::value_objects::Snowflake;
use wayfarer_core::DomainError;

use super::unknown_value;
use crate::models::{TravelPlanModel, TravelRequestModel};

impl TryFrom<TravelPlanModel> for TravelPlan {
    type Error = DomainError;

    fn try_from(model: TravelPlanModel) -> Result<Self, Self::Error> {
        let status = TravelPlanStatus::parse(&model.status)
            .ok_or_else(|| unknown_value("status", &model.status))?;
        Ok(TravelPlan {
            id: Snowflake::new(model.id),
            owner_id: Snowflake::new(model.owner_id),
            start_location: model.start_location,
            destination: model.destination,
            start_date: model.start_date,
            end_date: model.end_date,
            min_budget: model.min_budget,
            max_budget: model.max_budget,
            note: model.note,
            status,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<TravelRequestModel> for TravelRequest {
    type Error = DomainError;

    fn try_from(model: TravelRequestModel) -> Result<Self, Self::Error> {
        let status = TravelRequestStatus::parse(&model.status)
            .ok_or_else(|| unknown_value("status", &model.status))?;
        Ok(TravelRequest {
            id: Snowflake::new(model.id),
            plan_id: Snowflake::new(model.plan_id),
            requester_id: Snowflake::new(model.requester_id),
            note: model.note,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
