mod repositories;
mod store;

pub use repositories::{
    CommentRepository, FollowRepository, NotificationRepository, OutboxRepository, PostRepository,
    RepoResult, SavedPostRepository, TravelPlanRepository, TravelRequestRepository,
    UserRepository, VoteRepository,
};
pub use store::{NotificationSink, StoreTx, TransactionalStore};
