//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateCommentRequest, CreatePostRequest, CreateTravelPlanRequest, CreateTravelRequestRequest,
    RespondTravelRequestRequest, UpdateCommentRequest, UpdatePostRequest, VoteRequest,
};

pub use responses::{
    ApiResponse, CommentResponse, CommentThreadResponse, FollowResponse, HealthChecks,
    HealthResponse, MarkAllReadResponse, NotificationListResponse, NotificationResponse,
    PaginatedResponse, PostResponse, PublicUserResponse, ReadinessResponse, SaveResponse,
    TravelPlanResponse, TravelRequestResponse, VoteResponse, VoteStatusResponse,
};
