//! # wayfarer-service
//!
//! Application layer: the interaction use cases (toggles, threads, travel requests),
//! bounded conflict retry, and the outbox relay that delivers notifications.

pub mod dto;
pub mod services;

pub use services::{
    Actor, CommentService, FollowService, NotificationRelay, NotificationService, PostService,
    RetryPolicy, SavedPostService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, TravelService, UserService, VoteService,
};
