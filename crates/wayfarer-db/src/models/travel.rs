//! Travel plan and request database models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for travel_plans table
#[derive(Debug, Clone, FromRow)]
pub struct TravelPlanModel {
    pub id: i64,
    pub owner_id: i64,
    pub start_location: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_budget: i64,
    pub max_budget: i64,
    pub note: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Database model for travel_requests table
#[derive(Debug, Clone, FromRow)]
pub struct TravelRequestModel {
    pub id: i64,
    pub plan_id: i64,
    pub requester_id: i64,
    pub note: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
