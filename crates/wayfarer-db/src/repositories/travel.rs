//! PostgreSQL implementations of TravelPlanRepository and TravelRequestRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use wayfarer_core::entities::{TravelPlan, TravelRequest};
use wayfarer_core::traits::{RepoResult, TravelPlanRepository, TravelRequestRepository};
use wayfarer_core::value_objects::Snowflake;

use crate::models::{TravelPlanModel, TravelRequestModel};

use super::error::{map_db_error, map_missing_actor};

/// PostgreSQL implementation of TravelPlanRepository
#[derive(Clone)]
pub struct PgTravelPlanRepository {
    pool: PgPool,
}

impl PgTravelPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TravelPlanRepository for PgTravelPlanRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TravelPlan>> {
        let result = sqlx::query_as::<_, TravelPlanModel>(
            r"
            SELECT id, owner_id, start_location, destination, start_date, end_date,
                   min_budget, max_budget, note, status, created_at
            FROM travel_plans
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(TravelPlan::try_from).transpose()
    }

    #[instrument(skip(self, plan), fields(plan_id = %plan.id))]
    async fn create(&self, plan: &TravelPlan) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO travel_plans (id, owner_id, start_location, destination, start_date, end_date,
                                      min_budget, max_budget, note, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(plan.id.into_inner())
        .bind(plan.owner_id.into_inner())
        .bind(&plan.start_location)
        .bind(&plan.destination)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(plan.min_budget)
        .bind(plan.max_budget)
        .bind(&plan.note)
        .bind(plan.status.as_str())
        .bind(plan.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_missing_actor(e, plan.owner_id))?;

        Ok(())
    }
}

/// PostgreSQL implementation of TravelRequestRepository
#[derive(Clone)]
pub struct PgTravelRequestRepository {
    pool: PgPool,
}

impl PgTravelRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TravelRequestRepository for PgTravelRequestRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TravelRequest>> {
        let result = sqlx::query_as::<_, TravelRequestModel>(
            r"
            SELECT id, plan_id, requester_id, note, status, created_at, updated_at
            FROM travel_requests
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(TravelRequest::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_for_plan(&self, plan_id: Snowflake) -> RepoResult<Vec<TravelRequest>> {
        let rows = sqlx::query_as::<_, TravelRequestModel>(
            r"
            SELECT id, plan_id, requester_id, note, status, created_at, updated_at
            FROM travel_requests
            WHERE plan_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(plan_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(TravelRequest::try_from).collect()
    }
}
