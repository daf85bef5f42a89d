//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod notification;
mod post;
mod travel;
mod user;
mod vote;

pub use comment::CommentModel;
pub use notification::{NotificationModel, OutboxModel};
pub use post::PostModel;
pub use travel::{TravelPlanModel, TravelRequestModel};
pub use user::UserModel;
pub use vote::VoteModel;
