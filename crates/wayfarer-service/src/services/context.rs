//! Service context - dependency container for services
//!
//! Holds the repositories, the transactional store, the notification sink, and
//! the tunables every service reads. Storage is held behind the core traits, so
//! the same services run against PostgreSQL or an in-memory store.

use std::sync::Arc;

use wayfarer_core::traits::{
    CommentRepository, FollowRepository, NotificationRepository, NotificationSink,
    OutboxRepository, PostRepository, SavedPostRepository, TransactionalStore,
    TravelPlanRepository, TravelRequestRepository, UserRepository, VoteRepository,
};
use wayfarer_core::{Role, Snowflake, SnowflakeGenerator, ThreadRules};

use super::error::{ServiceError, ServiceResult};
use super::retry::RetryPolicy;

/// The authenticated caller of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Snowflake,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Snowflake, role: Role) -> Self {
        Self { id, role }
    }

    pub fn user(id: Snowflake) -> Self {
        Self::new(id, Role::User)
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    follow_repo: Arc<dyn FollowRepository>,
    saved_post_repo: Arc<dyn SavedPostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    travel_plan_repo: Arc<dyn TravelPlanRepository>,
    travel_request_repo: Arc<dyn TravelRequestRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    outbox_repo: Arc<dyn OutboxRepository>,

    // Writes that move edges and counters together
    store: Arc<dyn TransactionalStore>,

    // Live delivery
    sink: Arc<dyn NotificationSink>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    thread_rules: ThreadRules,
    retry_policy: RetryPolicy,
}

impl ServiceContext {
    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    pub fn follow_repo(&self) -> &dyn FollowRepository {
        self.follow_repo.as_ref()
    }

    pub fn saved_post_repo(&self) -> &dyn SavedPostRepository {
        self.saved_post_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn travel_plan_repo(&self) -> &dyn TravelPlanRepository {
        self.travel_plan_repo.as_ref()
    }

    pub fn travel_request_repo(&self) -> &dyn TravelRequestRepository {
        self.travel_request_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn outbox_repo(&self) -> &dyn OutboxRepository {
        self.outbox_repo.as_ref()
    }

    // === Transactions and delivery ===

    pub fn store(&self) -> &dyn TransactionalStore {
        self.store.as_ref()
    }

    pub fn sink(&self) -> &dyn NotificationSink {
        self.sink.as_ref()
    }

    // === Settings ===

    pub fn thread_rules(&self) -> ThreadRules {
        self.thread_rules
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("thread_rules", &self.thread_rules)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    follow_repo: Option<Arc<dyn FollowRepository>>,
    saved_post_repo: Option<Arc<dyn SavedPostRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    travel_plan_repo: Option<Arc<dyn TravelPlanRepository>>,
    travel_request_repo: Option<Arc<dyn TravelRequestRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    outbox_repo: Option<Arc<dyn OutboxRepository>>,
    store: Option<Arc<dyn TransactionalStore>>,
    sink: Option<Arc<dyn NotificationSink>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    thread_rules: ThreadRules,
    retry_policy: RetryPolicy,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn VoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn follow_repo(mut self, repo: Arc<dyn FollowRepository>) -> Self {
        self.follow_repo = Some(repo);
        self
    }

    pub fn saved_post_repo(mut self, repo: Arc<dyn SavedPostRepository>) -> Self {
        self.saved_post_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn travel_plan_repo(mut self, repo: Arc<dyn TravelPlanRepository>) -> Self {
        self.travel_plan_repo = Some(repo);
        self
    }

    pub fn travel_request_repo(mut self, repo: Arc<dyn TravelRequestRepository>) -> Self {
        self.travel_request_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn outbox_repo(mut self, repo: Arc<dyn OutboxRepository>) -> Self {
        self.outbox_repo = Some(repo);
        self
    }

    pub fn store(mut self, store: Arc<dyn TransactionalStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn thread_rules(mut self, rules: ThreadRules) -> Self {
        self.thread_rules = rules;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            post_repo: required(self.post_repo, "post_repo")?,
            vote_repo: required(self.vote_repo, "vote_repo")?,
            follow_repo: required(self.follow_repo, "follow_repo")?,
            saved_post_repo: required(self.saved_post_repo, "saved_post_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            travel_plan_repo: required(self.travel_plan_repo, "travel_plan_repo")?,
            travel_request_repo: required(self.travel_request_repo, "travel_request_repo")?,
            notification_repo: required(self.notification_repo, "notification_repo")?,
            outbox_repo: required(self.outbox_repo, "outbox_repo")?,
            store: required(self.store, "store")?,
            sink: required(self.sink, "sink")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            thread_rules: self.thread_rules,
            retry_policy: self.retry_policy,
        })
    }
}
