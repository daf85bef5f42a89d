//! Travel plan and join-request entities

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelPlanStatus {
    #[default]
    Open,
    Closed,
}

impl TravelPlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelPlan {
    pub id: Snowflake,
    pub owner_id: Snowflake,
    pub start_location: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_budget: i64,
    pub max_budget: i64,
    pub note: String,
    pub status: TravelPlanStatus,
    pub created_at: DateTime<Utc>,
}

impl TravelPlan {
    #[inline]
    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == TravelPlanStatus::Open
    }

    /// Inclusive length of the trip in days
    pub fn travel_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelRequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl TravelRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Only `pending` may move, and only to a final state
    pub fn can_transition_to(self, next: Self) -> bool {
        self == Self::Pending && next != Self::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelRequest {
    pub id: Snowflake,
    pub plan_id: Snowflake,
    pub requester_id: Snowflake,
    pub note: Option<String>,
    pub status: TravelRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TravelRequest {
    pub fn new(id: Snowflake, plan_id: Snowflake, requester_id: Snowflake, note: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            plan_id,
            requester_id,
            note,
            status: TravelRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
