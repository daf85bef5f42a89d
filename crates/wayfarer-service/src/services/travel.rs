//! Travel service
//!
//! Travel plans and the join requests other users send to them. A request is
//! answered at most once: the status change is conditional on it still being
//! pending.

use chrono::Utc;
use tracing::{info, instrument};

use wayfarer_core::entities::{
    NotificationKind, ResourceType, TravelPlan, TravelPlanStatus, TravelRequest,
    TravelRequestStatus,
};
use wayfarer_core::events::NotificationEvent;
use wayfarer_core::rules::AccessPolicy;
use wayfarer_core::traits::StoreTx;
use wayfarer_core::{Capabilities, DomainError, Snowflake};

use crate::dto::{
    CreateTravelPlanRequest, CreateTravelRequestRequest, TravelPlanResponse, TravelRequestResponse,
};

use super::context::{Actor, ServiceContext};
use super::error::ServiceResult;
use super::transaction::finish;

/// Travel service
pub struct TravelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TravelService<'a> {
    /// Create a new TravelService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Plans
    // ========================================================================

    #[instrument(skip(self, request), fields(actor_id = %actor.id))]
    pub async fn create_plan(
        &self,
        actor: Actor,
        request: CreateTravelPlanRequest,
    ) -> ServiceResult<TravelPlanResponse> {
        let plan = TravelPlan {
            id: self.ctx.generate_id(),
            owner_id: actor.id,
            start_location: request.start_location.trim().to_string(),
            destination: request.destination.trim().to_string(),
            start_date: request.start_date,
            end_date: request.end_date,
            min_budget: request.min_budget,
            max_budget: request.max_budget,
            note: request.note,
            status: TravelPlanStatus::Open,
            created_at: Utc::now(),
        };

        self.ctx.travel_plan_repo().create(&plan).await?;
        info!(plan_id = %plan.id, "Travel plan created");

        Ok(TravelPlanResponse::from(&plan))
    }

    #[instrument(skip(self))]
    pub async fn get_plan(&self, plan_id: Snowflake) -> ServiceResult<TravelPlanResponse> {
        let plan = self.plan(plan_id).await?;
        Ok(TravelPlanResponse::from(&plan))
    }

    async fn plan(&self, plan_id: Snowflake) -> ServiceResult<TravelPlan> {
        self.ctx
            .travel_plan_repo()
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| DomainError::TravelPlanNotFound(plan_id).into())
    }

    // ========================================================================
    // Join requests
    // ========================================================================

    /// Ask to join someone else's open plan; notifies the owner
    #[instrument(skip(self, request), fields(actor_id = %actor.id))]
    pub async fn create_request(
        &self,
        actor: Actor,
        plan_id: Snowflake,
        request: CreateTravelRequestRequest,
    ) -> ServiceResult<TravelRequestResponse> {
        let plan = self.plan(plan_id).await?;
        if !plan.is_open() {
            return Err(DomainError::TravelPlanClosed.into());
        }
        if plan.is_owned_by(actor.id) {
            return Err(DomainError::CannotRequestOwnPlan.into());
        }

        let note = request
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());
        let travel_request = TravelRequest::new(self.ctx.generate_id(), plan.id, actor.id, note);

        let mut tx = self.ctx.store().begin().await?;
        let result = self
            .write_request(tx.as_mut(), &plan, &travel_request)
            .await;
        finish(tx, result).await?;

        info!(request_id = %travel_request.id, plan_id = %plan_id, "Travel request created");
        Ok(TravelRequestResponse::from(&travel_request))
    }

    async fn write_request(
        &self,
        tx: &mut dyn StoreTx,
        plan: &TravelPlan,
        request: &TravelRequest,
    ) -> ServiceResult<()> {
        tx.insert_travel_request(request).await?;

        if let Some(event) = NotificationEvent::for_recipient(
            plan.owner_id,
            request.requester_id,
            NotificationKind::TravelRequest,
            ResourceType::TravelPlan,
            plan.id,
        ) {
            tx.enqueue_notification(self.ctx.generate_id(), &event).await?;
        }
        Ok(())
    }

    /// Requests on a plan, newest first. Owner, or anyone allowed to view all requests.
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn list_requests(
        &self,
        actor: Actor,
        plan_id: Snowflake,
    ) -> ServiceResult<Vec<TravelRequestResponse>> {
        let plan = self.plan(plan_id).await?;

        AccessPolicy::require(
            actor.role,
            actor.id,
            plan.owner_id,
            Capabilities::VIEW_ANY_TRAVEL_REQUESTS,
            "view travel requests",
        )?;

        let requests = self.ctx.travel_request_repo().list_for_plan(plan_id).await?;
        Ok(requests.iter().map(TravelRequestResponse::from).collect())
    }

    /// Accept or reject a pending request; notifies the requester
    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn respond(
        &self,
        actor: Actor,
        request_id: Snowflake,
        status: TravelRequestStatus,
    ) -> ServiceResult<TravelRequestResponse> {
        let mut request = self
            .ctx
            .travel_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::TravelRequestNotFound(request_id))?;
        let plan = self.plan(request.plan_id).await?;

        AccessPolicy::require(
            actor.role,
            actor.id,
            plan.owner_id,
            Capabilities::MANAGE_TRAVEL_REQUESTS,
            "respond to travel request",
        )?;

        if status == TravelRequestStatus::Pending {
            return Err(DomainError::ValidationError("status must be accepted or rejected".into()).into());
        }
        if !request.status.can_transition_to(status) {
            return Err(DomainError::RequestAlreadyResolved(request.status.as_str().to_string()).into());
        }

        let mut tx = self.ctx.store().begin().await?;
        let result = self.write_response(tx.as_mut(), actor, &request, status).await;
        finish(tx, result).await?;

        request.status = status;
        request.updated_at = Utc::now();
        info!(request_id = %request_id, status = status.as_str(), "Travel request answered");

        Ok(TravelRequestResponse::from(&request))
    }

    async fn write_response(
        &self,
        tx: &mut dyn StoreTx,
        actor: Actor,
        request: &TravelRequest,
        status: TravelRequestStatus,
    ) -> ServiceResult<()> {
        // Someone else answered between our read and this write
        if !tx
            .transition_travel_request(request.id, TravelRequestStatus::Pending, status)
            .await?
        {
            return Err(DomainError::RequestAlreadyResolved("answered".into()).into());
        }

        let kind = if status == TravelRequestStatus::Accepted {
            NotificationKind::RequestAccepted
        } else {
            NotificationKind::RequestRejected
        };

        if let Some(event) = NotificationEvent::for_recipient(
            request.requester_id,
            actor.id,
            kind,
            ResourceType::TravelRequest,
            request.id,
        ) {
            tx.enqueue_notification(self.ctx.generate_id(), &event).await?;
        }
        Ok(())
    }
}
