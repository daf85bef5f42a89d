//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Domain bounds (comment length, depth) are enforced again by the rules.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use wayfarer_core::{PostCategory, Snowflake, TravelRequestStatus, VoteKind};

// ============================================================================
// Post Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: String,

    #[validate(length(min = 100, message = "Content must be at least 100 characters"))]
    pub content: String,

    pub category: PostCategory,

    #[serde(default)]
    pub premium: bool,
}

/// Partial author edit; absent fields stay as they are
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 100, message = "Content must be at least 100 characters"))]
    pub content: Option<String>,

    pub category: Option<PostCategory>,

    pub premium: Option<bool>,
}

/// Toggle body: repeating the held kind removes it, the other kind switches
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct VoteRequest {
    pub kind: VoteKind,
}

// ============================================================================
// Comment Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,

    /// Reply target; absent for a root comment
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

// ============================================================================
// Travel Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_plan_window"))]
pub struct CreateTravelPlanRequest {
    #[validate(length(min = 1, max = 120, message = "Start location is required"))]
    pub start_location: String,

    #[validate(length(min = 1, max = 120, message = "Destination is required"))]
    pub destination: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[validate(range(min = 0, message = "Budget cannot be negative"))]
    pub min_budget: i64,

    #[validate(range(min = 0, message = "Budget cannot be negative"))]
    pub max_budget: i64,

    #[serde(default)]
    #[validate(length(max = 200, message = "Maximum 200 characters are allowed"))]
    pub note: String,
}

fn validate_plan_window(request: &CreateTravelPlanRequest) -> Result<(), ValidationError> {
    if request.end_date < request.start_date {
        return Err(ValidationError::new("date_range").with_message("End date is before start date".into()));
    }
    if request.max_budget < request.min_budget {
        return Err(ValidationError::new("budget_range").with_message("Max budget is below min budget".into()));
    }
    Ok(())
}

/// Ask to join a travel plan
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTravelRequestRequest {
    #[serde(default, alias = "requestNote")]
    #[validate(length(max = 200, message = "Maximum 200 characters are allowed"))]
    pub note: Option<String>,
}

/// Owner's answer to a join request
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct RespondTravelRequestRequest {
    pub status: TravelRequestStatus,
}
