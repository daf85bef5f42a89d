//! Business logic services
//!
//! Each service borrows the [`ServiceContext`] and implements one group of use
//! cases. Writes that move an edge and a counter together go through a store
//! transaction and are retried as a whole on conflict.

pub mod comment;
pub mod context;
pub mod error;
pub mod follow;
pub mod notification;
pub mod post;
pub mod relay;
pub mod retry;
pub mod saved_post;
pub mod travel;
pub mod user;
pub mod vote;

mod transaction;

#[cfg(test)]
pub(crate) mod testing;

pub use comment::CommentService;
pub use context::{Actor, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use follow::FollowService;
pub use notification::NotificationService;
pub use post::PostService;
pub use relay::NotificationRelay;
pub use retry::RetryPolicy;
pub use saved_post::SavedPostService;
pub use travel::TravelService;
pub use user::UserService;
pub use vote::VoteService;
