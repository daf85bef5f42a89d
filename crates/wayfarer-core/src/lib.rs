//! # wayfarer-core
//!
//! Domain layer for the interaction subsystem: entities, value objects, the pure
//! toggle/thread/access rules, and the storage traits the infrastructure implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod rules;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Comment, Follow, Notification, NotificationKind, Post, PostCategory, PostSort, ResourceType, Role,
    SavedPost, TravelPlan, TravelPlanStatus, TravelRequest, TravelRequestStatus, User, Vote,
    VoteKind,
};
pub use error::DomainError;
pub use events::{NotificationEvent, OutboxEntry};
pub use rules::{
    AccessPolicy, EdgeMutation, FollowTransition, ReplyPreview, ThreadRules, ToggleAction,
    VoteTransition,
};
pub use traits::{
    CommentRepository, FollowRepository, NotificationRepository, NotificationSink,
    OutboxRepository, PostRepository, RepoResult, SavedPostRepository, StoreTx,
    TransactionalStore, TravelPlanRepository, TravelRequestRepository, UserRepository,
    VoteRepository,
};
pub use value_objects::{
    Capabilities, CounterDelta, CounterField, PageMeta, PageRequest, Snowflake,
    SnowflakeGenerator, SnowflakeParseError,
};
