//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Parent comment not found: {0}")]
    ParentCommentNotFound(Snowflake),

    #[error("Travel plan not found: {0}")]
    TravelPlanNotFound(Snowflake),

    #[error("Travel request not found: {0}")]
    TravelRequestNotFound(Snowflake),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Invalid Transitions
    // =========================================================================
    #[error("You cannot follow yourself")]
    CannotFollowSelf,

    #[error("Reply depth limit reached: max depth {max}")]
    DepthExceeded { max: i32 },

    #[error("Travel request has already been {0}")]
    RequestAlreadyResolved(String),

    #[error("You cannot request your own travel plan")]
    CannotRequestOwnPlan,

    #[error("Travel plan is closed")]
    TravelPlanClosed,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Not comment author")]
    NotCommentAuthor,

    #[error("Not travel plan owner")]
    NotPlanOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    /// A concurrent writer changed the same edge; the whole operation may be retried
    #[error("Concurrent modification, please retry")]
    TransactionConflict,

    #[error("Travel plan already requested")]
    AlreadyRequested,

    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::ParentCommentNotFound(_) => "UNKNOWN_PARENT_COMMENT",
            Self::TravelPlanNotFound(_) => "UNKNOWN_TRAVEL_PLAN",
            Self::TravelRequestNotFound(_) => "UNKNOWN_TRAVEL_REQUEST",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Invalid transitions
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::DepthExceeded { .. } => "DEPTH_EXCEEDED",
            Self::RequestAlreadyResolved(_) => "REQUEST_ALREADY_RESOLVED",
            Self::CannotRequestOwnPlan => "CANNOT_REQUEST_OWN_PLAN",
            Self::TravelPlanClosed => "TRAVEL_PLAN_CLOSED",

            // Authorization
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::NotPlanOwner => "NOT_PLAN_OWNER",

            // Conflict
            Self::TransactionConflict => "TRANSACTION_CONFLICT",
            Self::AlreadyRequested => "ALREADY_REQUESTED",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::PostNotFound(_)
                | Self::CommentNotFound(_)
                | Self::ParentCommentNotFound(_)
                | Self::TravelPlanNotFound(_)
                | Self::TravelRequestNotFound(_)
                | Self::NotificationNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::EmptyContent | Self::ContentTooLong { .. }
        )
    }

    /// Check if the requested state change is not allowed from the current state
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            Self::CannotFollowSelf
                | Self::DepthExceeded { .. }
                | Self::RequestAlreadyResolved(_)
                | Self::CannotRequestOwnPlan
                | Self::TravelPlanClosed
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::Forbidden(_) | Self::NotCommentAuthor | Self::NotPlanOwner
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::TransactionConflict | Self::AlreadyRequested | Self::EmailAlreadyExists
        )
    }

    /// Only concurrent-modification conflicts are worth re-running the operation for
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionConflict)
    }
}
