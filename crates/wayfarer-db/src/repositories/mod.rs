//! Repository implementations

mod comment;
mod error;
mod follow;
mod notification;
mod outbox;
mod post;
mod saved_post;
mod transaction;
mod travel;
mod user;
mod vote;

pub use comment::PgCommentRepository;
pub use error::{
    expect_one_row, map_db_error, map_edge_insert, map_missing_actor, map_unique_violation,
};
pub use follow::PgFollowRepository;
pub use notification::PgNotificationRepository;
pub use outbox::PgOutboxRepository;
pub use post::PgPostRepository;
pub use saved_post::PgSavedPostRepository;
pub use transaction::{PgStoreTx, PgTransactionalStore};
pub use travel::{PgTravelPlanRepository, PgTravelRequestRepository};
pub use user::PgUserRepository;
pub use vote::PgVoteRepository;
