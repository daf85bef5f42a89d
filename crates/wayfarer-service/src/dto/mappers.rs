//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use wayfarer_core::entities::{Comment, Notification, Post, TravelPlan, TravelRequest, User};

use super::responses::{
    CommentResponse, NotificationResponse, PostResponse, PublicUserResponse, TravelPlanResponse,
    TravelRequestResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
            is_verified: user.is_verified,
            follower_count: user.follower_count,
            following_count: user.following_count,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Post Mappers
// ============================================================================

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.category,
            premium: post.premium,
            upvote_count: post.upvote_count,
            downvote_count: post.downvote_count,
            score: post.score(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        let comment = comment.redacted();
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            depth: comment.depth,
            reply_count: comment.reply_count,
            content: comment.content,
            is_deleted: comment.is_deleted,
            is_edited: comment.is_edited,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

// ============================================================================
// Travel Mappers
// ============================================================================

impl From<&TravelPlan> for TravelPlanResponse {
    fn from(plan: &TravelPlan) -> Self {
        Self {
            id: plan.id,
            owner_id: plan.owner_id,
            start_location: plan.start_location.clone(),
            destination: plan.destination.clone(),
            start_date: plan.start_date,
            end_date: plan.end_date,
            travel_days: plan.travel_days(),
            min_budget: plan.min_budget,
            max_budget: plan.max_budget,
            note: plan.note.clone(),
            status: plan.status,
            created_at: plan.created_at,
        }
    }
}

impl From<&TravelRequest> for TravelRequestResponse {
    fn from(request: &TravelRequest) -> Self {
        Self {
            id: request.id,
            plan_id: request.plan_id,
            requester_id: request.requester_id,
            note: request.note.clone(),
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<&Notification> for NotificationResponse {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            sender_id: notification.sender_id,
            kind: notification.kind,
            resource_type: notification.resource_type,
            resource_id: notification.resource_id,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}
