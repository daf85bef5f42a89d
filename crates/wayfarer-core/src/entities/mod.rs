//! Domain entities - core business objects

mod comment;
mod follow;
mod notification;
mod post;
mod saved_post;
mod travel;
mod user;
mod vote;

pub use comment::Comment;
pub use follow::Follow;
pub use notification::{Notification, NotificationKind, ResourceType};
pub use post::{Post, PostCategory, PostSort};
pub use saved_post::SavedPost;
pub use travel::{TravelPlan, TravelPlanStatus, TravelRequest, TravelRequestStatus};
pub use user::{Role, User};
pub use vote::{Vote, VoteKind};
