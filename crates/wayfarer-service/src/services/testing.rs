//! In-memory storage for service tests
//!
//! A transaction takes the whole state lock and works on a copy; commit swaps
//! the copy in, dropping it discards every write. That makes concurrent
//! transactions serial, which is enough to check that edges and counters never
//! diverge. Conflicts and counter failures can be injected.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use wayfarer_core::entities::{
    Comment, Follow, Notification, Post, PostCategory, PostSort, Role, SavedPost, TravelPlan,
    TravelPlanStatus, TravelRequest, TravelRequestStatus, User, Vote, VoteKind,
};
use wayfarer_core::events::{NotificationEvent, OutboxEntry};
use wayfarer_core::rules::{EdgeMutation, ThreadRules};
use wayfarer_core::traits::{
    CommentRepository, FollowRepository, NotificationRepository, NotificationSink,
    OutboxRepository, PostRepository, RepoResult, SavedPostRepository, StoreTx,
    TransactionalStore, TravelPlanRepository, TravelRequestRepository, UserRepository,
    VoteRepository,
};
use wayfarer_core::{CounterDelta, CounterField, DomainError, PageRequest, Snowflake, SnowflakeGenerator};

use super::context::{Actor, ServiceContext, ServiceContextBuilder};
use super::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub(crate) struct OutboxRow {
    pub entry: OutboxEntry,
    pub locked_until: Option<DateTime<Utc>>,
    pub delivered: bool,
    pub failed: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryState {
    pub users: HashMap<Snowflake, User>,
    pub posts: HashMap<Snowflake, Post>,
    /// Keyed by `(post_id, user_id)`
    pub votes: HashMap<(Snowflake, Snowflake), Vote>,
    /// Keyed by `(follower_id, following_id)`
    pub follows: HashMap<(Snowflake, Snowflake), Follow>,
    /// Keyed by `(user_id, post_id)`
    pub saved: HashMap<(Snowflake, Snowflake), SavedPost>,
    pub comments: HashMap<Snowflake, Comment>,
    pub plans: HashMap<Snowflake, TravelPlan>,
    pub requests: HashMap<Snowflake, TravelRequest>,
    pub notifications: HashMap<Snowflake, Notification>,
    pub outbox: Vec<OutboxRow>,
}

impl MemoryState {
    fn vote_count(&self, post_id: Snowflake, kind: VoteKind) -> i64 {
        self.votes
            .values()
            .filter(|v| v.post_id == post_id && v.kind == kind)
            .count() as i64
    }

    fn active_users<'a>(&'a self, ids: impl Iterator<Item = (Snowflake, DateTime<Utc>)>) -> Vec<(DateTime<Utc>, &'a User)> {
        ids.filter_map(|(id, at)| self.users.get(&id).filter(|u| u.is_active()).map(|u| (at, u)))
            .collect()
    }

    /// Stands in for the `users` foreign key on edge and content rows
    fn require_user(&self, id: Snowflake) -> RepoResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(DomainError::UserNotFound(id))
        }
    }

    fn counter_mut(&mut self, delta: &CounterDelta) -> RepoResult<&mut i64> {
        let id = delta.document;
        match delta.field {
            CounterField::PostUpvotes | CounterField::PostDownvotes => {
                let post = self
                    .posts
                    .get_mut(&id)
                    .filter(|p| !p.is_deleted)
                    .ok_or(DomainError::PostNotFound(id))?;
                Ok(if delta.field == CounterField::PostUpvotes {
                    &mut post.upvote_count
                } else {
                    &mut post.downvote_count
                })
            }
            CounterField::UserFollowers | CounterField::UserFollowing => {
                let user = self
                    .users
                    .get_mut(&id)
                    .filter(|u| !u.is_deleted)
                    .ok_or(DomainError::UserNotFound(id))?;
                Ok(if delta.field == CounterField::UserFollowers {
                    &mut user.follower_count
                } else {
                    &mut user.following_count
                })
            }
            CounterField::CommentReplies => {
                let comment = self
                    .comments
                    .get_mut(&id)
                    .filter(|c| !c.is_deleted)
                    .ok_or(DomainError::CommentNotFound(id))?;
                Ok(&mut comment.reply_count)
            }
        }
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect()
}

/// Every storage trait backed by one shared in-memory state
#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    /// Edge writes that fail with `TransactionConflict` before succeeding
    pub conflicts_remaining: AtomicU32,
    pub fail_counter_deltas: AtomicBool,
    pub fail_sink: AtomicBool,
    pub pushed: std::sync::Mutex<Vec<Notification>>,
    pub transactions_begun: AtomicU32,
}

impl MemoryStore {
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub async fn insert_user(&self, user: User) {
        self.state.lock().await.users.insert(user.id, user);
    }

    pub async fn insert_post(&self, post: Post) {
        self.state.lock().await.posts.insert(post.id, post);
    }

    pub async fn insert_plan(&self, plan: TravelPlan) {
        self.state.lock().await.plans.insert(plan.id, plan);
    }

    pub async fn delete_user(&self, id: Snowflake) {
        if let Some(user) = self.state.lock().await.users.get_mut(&id) {
            user.is_deleted = true;
        }
    }

    pub fn pushed(&self) -> Vec<Notification> {
        self.pushed.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

// ============================================================================
// Repositories
// ============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.state.lock().await.users.values().any(|u| u.email == email))
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.state.lock().await.posts.get(&id).cloned())
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        state.require_user(post.author_id)?;
        state.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn list(&self, page: PageRequest, sort: PostSort) -> RepoResult<Vec<Post>> {
        let state = self.state.lock().await;
        let mut posts: Vec<&Post> = state.posts.values().filter(|p| !p.is_deleted).collect();
        match sort {
            PostSort::Latest => posts.sort_by_key(|p| std::cmp::Reverse((p.created_at, p.id))),
            PostSort::Popular => {
                posts.sort_by_key(|p| std::cmp::Reverse((p.upvote_count, p.created_at, p.id)));
            }
        }
        Ok(paginate(posts.into_iter().cloned().collect(), page))
    }

    async fn count_live(&self) -> RepoResult<i64> {
        let state = self.state.lock().await;
        Ok(state.posts.values().filter(|p| !p.is_deleted).count() as i64)
    }

    async fn list_by_author(&self, author_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Post>> {
        let state = self.state.lock().await;
        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|p| p.author_id == author_id && !p.is_deleted)
            .collect();
        posts.sort_by_key(|p| std::cmp::Reverse((p.created_at, p.id)));
        Ok(paginate(posts.into_iter().cloned().collect(), page))
    }

    async fn count_by_author(&self, author_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .posts
            .values()
            .filter(|p| p.author_id == author_id && !p.is_deleted)
            .count() as i64)
    }

    async fn update_details(&self, post: &Post) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        Ok(match state.posts.get_mut(&post.id) {
            Some(stored) if !stored.is_deleted => {
                stored.title.clone_from(&post.title);
                stored.content.clone_from(&post.content);
                stored.category = post.category;
                stored.premium = post.premium;
                stored.updated_at = post.updated_at;
                true
            }
            _ => false,
        })
    }

    async fn soft_delete(&self, id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        Ok(match state.posts.get_mut(&id) {
            Some(post) if !post.is_deleted => {
                post.is_deleted = true;
                true
            }
            _ => false,
        })
    }
}

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn find(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Vote>> {
        Ok(self.state.lock().await.votes.get(&(post_id, user_id)).cloned())
    }

    async fn count_by_kind(&self, post_id: Snowflake, kind: VoteKind) -> RepoResult<i64> {
        Ok(self.state.lock().await.vote_count(post_id, kind))
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn is_following(&self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .follows
            .contains_key(&(follower_id, following_id)))
    }

    async fn list_followers(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<User>> {
        let state = self.state.lock().await;
        let edges = state
            .follows
            .values()
            .filter(|f| f.following_id == user_id)
            .map(|f| (f.follower_id, f.created_at));
        let mut users = state.active_users(edges);
        users.sort_by(|a, b| (b.0, b.1.id).cmp(&(a.0, a.1.id)));
        Ok(paginate(users.into_iter().map(|(_, u)| u.clone()).collect(), page))
    }

    async fn count_followers(&self, user_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock().await;
        let edges = state
            .follows
            .values()
            .filter(|f| f.following_id == user_id)
            .map(|f| (f.follower_id, f.created_at));
        Ok(state.active_users(edges).len() as i64)
    }

    async fn list_following(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<User>> {
        let state = self.state.lock().await;
        let edges = state
            .follows
            .values()
            .filter(|f| f.follower_id == user_id)
            .map(|f| (f.following_id, f.created_at));
        let mut users = state.active_users(edges);
        users.sort_by(|a, b| (b.0, b.1.id).cmp(&(a.0, a.1.id)));
        Ok(paginate(users.into_iter().map(|(_, u)| u.clone()).collect(), page))
    }

    async fn count_following(&self, user_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock().await;
        let edges = state
            .follows
            .values()
            .filter(|f| f.follower_id == user_id)
            .map(|f| (f.following_id, f.created_at));
        Ok(state.active_users(edges).len() as i64)
    }
}

#[async_trait]
impl SavedPostRepository for MemoryStore {
    async fn is_saved(&self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool> {
        Ok(self.state.lock().await.saved.contains_key(&(user_id, post_id)))
    }

    async fn list_saved_posts(&self, user_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Post>> {
        let state = self.state.lock().await;
        let mut posts: Vec<(DateTime<Utc>, &Post)> = state
            .saved
            .values()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                state
                    .posts
                    .get(&s.post_id)
                    .filter(|p| !p.is_deleted)
                    .map(|p| (s.created_at, p))
            })
            .collect();
        posts.sort_by(|a, b| (b.0, b.1.id).cmp(&(a.0, a.1.id)));
        Ok(paginate(posts.into_iter().map(|(_, p)| p.clone()).collect(), page))
    }

    async fn count_saved_posts(&self, user_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .saved
            .values()
            .filter(|s| s.user_id == user_id)
            .filter(|s| state.posts.get(&s.post_id).is_some_and(|p| !p.is_deleted))
            .count() as i64)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.state.lock().await.comments.get(&id).cloned())
    }

    async fn list_roots(&self, post_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Comment>> {
        let state = self.state.lock().await;
        let mut roots: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.is_root())
            .cloned()
            .collect();
        roots.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(paginate(roots, page))
    }

    async fn count_roots(&self, post_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.is_root())
            .count() as i64)
    }

    async fn list_replies(&self, parent_id: Snowflake, page: PageRequest) -> RepoResult<Vec<Comment>> {
        let replies = self.list_all_replies(&[parent_id]).await?;
        Ok(paginate(replies, page))
    }

    async fn list_all_replies(&self, parent_ids: &[Snowflake]) -> RepoResult<Vec<Comment>> {
        let state = self.state.lock().await;
        let mut replies: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.parent_id.is_some_and(|p| parent_ids.contains(&p)))
            .cloned()
            .collect();
        replies.sort_by_key(|c| (c.created_at, c.id));
        Ok(replies)
    }

    async fn count_replies(&self, parent_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .count() as i64)
    }

    async fn update_content(&self, id: Snowflake, content: &str) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        Ok(match state.comments.get_mut(&id) {
            Some(comment) if !comment.is_deleted => {
                comment.edit(content.to_string());
                true
            }
            _ => false,
        })
    }

    async fn soft_delete(&self, id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        Ok(match state.comments.get_mut(&id) {
            Some(comment) if !comment.is_deleted => {
                comment.is_deleted = true;
                true
            }
            _ => false,
        })
    }
}

#[async_trait]
impl TravelPlanRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TravelPlan>> {
        Ok(self.state.lock().await.plans.get(&id).cloned())
    }

    async fn create(&self, plan: &TravelPlan) -> RepoResult<()> {
        self.state.lock().await.plans.insert(plan.id, plan.clone());
        Ok(())
    }
}

#[async_trait]
impl TravelRequestRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<TravelRequest>> {
        Ok(self.state.lock().await.requests.get(&id).cloned())
    }

    async fn list_for_plan(&self, plan_id: Snowflake) -> RepoResult<Vec<TravelRequest>> {
        let state = self.state.lock().await;
        let mut requests: Vec<TravelRequest> = state
            .requests
            .values()
            .filter(|r| r.plan_id == plan_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(requests)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert_if_absent(&self, notification: &Notification) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        if state.notifications.contains_key(&notification.id) {
            return Ok(false);
        }
        state.notifications.insert(notification.id, notification.clone());
        Ok(true)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Snowflake,
        page: PageRequest,
    ) -> RepoResult<Vec<Notification>> {
        let state = self.state.lock().await;
        let mut items: Vec<Notification> = state
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(paginate(items, page))
    }

    async fn count_for_recipient(&self, recipient_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .count() as i64)
    }

    async fn count_unread(&self, recipient_id: Snowflake) -> RepoResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .count() as i64)
    }

    async fn mark_read(&self, id: Snowflake, recipient_id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        Ok(match state.notifications.get_mut(&id) {
            Some(n) if n.recipient_id == recipient_id => {
                n.is_read = true;
                true
            }
            _ => false,
        })
    }

    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64> {
        let mut state = self.state.lock().await;
        let mut updated = 0;
        for n in state.notifications.values_mut() {
            if n.recipient_id == recipient_id && !n.is_read {
                n.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[async_trait]
impl OutboxRepository for MemoryStore {
    async fn claim_batch(&self, limit: i64, lease: Duration) -> RepoResult<Vec<OutboxEntry>> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let lease = chrono::Duration::from_std(lease).expect("lease fits in a chrono duration");

        let mut claimed = Vec::new();
        for row in state.outbox.iter_mut() {
            if claimed.len() as i64 >= limit {
                break;
            }
            let leased = row.locked_until.is_some_and(|until| until > now);
            if row.delivered || row.failed || leased {
                continue;
            }
            row.locked_until = Some(now + lease);
            row.entry.attempts += 1;
            claimed.push(row.entry.clone());
        }
        Ok(claimed)
    }

    async fn mark_delivered(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        if let Some(row) = state.outbox.iter_mut().find(|r| r.entry.id == id) {
            row.delivered = true;
            row.locked_until = None;
        }
        Ok(())
    }

    async fn record_failure(&self, id: Snowflake, max_attempts: i32) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        let row = state
            .outbox
            .iter_mut()
            .find(|r| r.entry.id == id)
            .ok_or_else(|| DomainError::InternalError(format!("outbox entry {id} missing")))?;
        row.locked_until = None;
        row.failed = row.entry.attempts >= max_attempts;
        Ok(row.failed)
    }
}

#[async_trait]
impl NotificationSink for MemoryStore {
    async fn notify(&self, notification: &Notification) -> RepoResult<()> {
        if self.fail_sink.load(Ordering::SeqCst) {
            return Err(DomainError::CacheError("sink unavailable".into()));
        }
        if let Ok(mut pushed) = self.pushed.lock() {
            pushed.push(notification.clone());
        }
        Ok(())
    }
}

// ============================================================================
// Transactions
// ============================================================================

#[async_trait]
impl TransactionalStore for MemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        self.transactions_begun.fetch_add(1, Ordering::SeqCst);

        // Failure flags are read once per transaction
        let conflict = self
            .conflicts_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        Ok(Box::new(MemoryTx {
            guard,
            working,
            conflict,
            fail_counters: self.fail_counter_deltas.load(Ordering::SeqCst),
        }))
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    conflict: bool,
    fail_counters: bool,
}

impl MemoryTx {
    fn check_conflict(&self) -> RepoResult<()> {
        if self.conflict {
            Err(DomainError::TransactionConflict)
        } else {
            Ok(())
        }
    }
}

fn presence<T>(
    edges: &mut HashMap<(Snowflake, Snowflake), T>,
    key: (Snowflake, Snowflake),
    value: T,
    mutation: EdgeMutation,
) -> RepoResult<()> {
    match mutation {
        EdgeMutation::Insert(()) => {
            if edges.contains_key(&key) {
                return Err(DomainError::TransactionConflict);
            }
            edges.insert(key, value);
            Ok(())
        }
        EdgeMutation::Delete(()) => edges
            .remove(&key)
            .map(|_| ())
            .ok_or(DomainError::TransactionConflict),
        EdgeMutation::Update { .. } => Err(DomainError::InternalError(
            "presence edges have no payload to update".into(),
        )),
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_vote(&mut self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<VoteKind>> {
        Ok(self.working.votes.get(&(post_id, user_id)).map(|v| v.kind))
    }

    async fn apply_vote(&mut self, vote: &Vote, mutation: EdgeMutation<VoteKind>) -> RepoResult<()> {
        self.check_conflict()?;
        if matches!(mutation, EdgeMutation::Insert(_)) {
            self.working.require_user(vote.user_id)?;
        }
        let key = (vote.post_id, vote.user_id);
        let current = self.working.votes.get(&key).map(|v| v.kind);

        match mutation {
            EdgeMutation::Insert(kind) if current.is_none() => {
                self.working
                    .votes
                    .insert(key, Vote::new(vote.post_id, vote.user_id, kind));
            }
            EdgeMutation::Update { from, to } if current == Some(from) => {
                if let Some(existing) = self.working.votes.get_mut(&key) {
                    existing.kind = to;
                    existing.updated_at = Utc::now();
                }
            }
            EdgeMutation::Delete(kind) if current == Some(kind) => {
                self.working.votes.remove(&key);
            }
            _ => return Err(DomainError::TransactionConflict),
        }
        Ok(())
    }

    async fn lock_follow(&mut self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool> {
        Ok(self.working.follows.contains_key(&(follower_id, following_id)))
    }

    async fn apply_follow(&mut self, follow: &Follow, mutation: EdgeMutation) -> RepoResult<()> {
        self.check_conflict()?;
        if matches!(mutation, EdgeMutation::Insert(())) {
            self.working.require_user(follow.follower_id)?;
        }
        presence(
            &mut self.working.follows,
            (follow.follower_id, follow.following_id),
            follow.clone(),
            mutation,
        )
    }

    async fn lock_saved(&mut self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool> {
        Ok(self.working.saved.contains_key(&(user_id, post_id)))
    }

    async fn apply_saved(&mut self, saved: &SavedPost, mutation: EdgeMutation) -> RepoResult<()> {
        self.check_conflict()?;
        if matches!(mutation, EdgeMutation::Insert(())) {
            self.working.require_user(saved.user_id)?;
        }
        presence(
            &mut self.working.saved,
            (saved.user_id, saved.post_id),
            saved.clone(),
            mutation,
        )
    }

    async fn find_comment(&mut self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.working.comments.get(&id).cloned())
    }

    async fn insert_comment(&mut self, comment: &Comment) -> RepoResult<()> {
        self.check_conflict()?;
        self.working.require_user(comment.author_id)?;
        self.working.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn insert_travel_request(&mut self, request: &TravelRequest) -> RepoResult<()> {
        let duplicate = self
            .working
            .requests
            .values()
            .any(|r| r.plan_id == request.plan_id && r.requester_id == request.requester_id);
        if duplicate {
            return Err(DomainError::AlreadyRequested);
        }
        self.working.require_user(request.requester_id)?;
        self.working.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn transition_travel_request(
        &mut self,
        id: Snowflake,
        from: TravelRequestStatus,
        to: TravelRequestStatus,
    ) -> RepoResult<bool> {
        Ok(match self.working.requests.get_mut(&id) {
            Some(request) if request.status == from => {
                request.status = to;
                request.updated_at = Utc::now();
                true
            }
            _ => false,
        })
    }

    async fn apply_counter_deltas(&mut self, deltas: &[CounterDelta]) -> RepoResult<()> {
        if self.fail_counters {
            return Err(DomainError::DatabaseError("injected counter failure".into()));
        }
        for delta in CounterDelta::merge(deltas) {
            let counter = self.working.counter_mut(&delta)?;
            let next = *counter + i64::from(delta.delta);
            if next < 0 {
                return Err(DomainError::DatabaseError(format!("{} would go negative", delta.field)));
            }
            *counter = next;
        }
        Ok(())
    }

    async fn enqueue_notification(&mut self, id: Snowflake, event: &NotificationEvent) -> RepoResult<()> {
        self.working.outbox.push(OutboxRow {
            entry: OutboxEntry {
                id,
                event: event.clone(),
                attempts: 0,
                created_at: Utc::now(),
            },
            locked_until: None,
            delivered: false,
            failed: false,
        });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let MemoryTx {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A service context wired to one [`MemoryStore`]
pub(crate) struct Harness {
    pub store: Arc<MemoryStore>,
    pub ctx: ServiceContext,
    ids: Arc<SnowflakeGenerator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_rules(ThreadRules::default())
    }

    pub fn with_rules(rules: ThreadRules) -> Self {
        let store = Arc::new(MemoryStore::default());
        let ids = Arc::new(SnowflakeGenerator::new(1));

        let ctx = ServiceContextBuilder::new()
            .user_repo(store.clone())
            .post_repo(store.clone())
            .vote_repo(store.clone())
            .follow_repo(store.clone())
            .saved_post_repo(store.clone())
            .comment_repo(store.clone())
            .travel_plan_repo(store.clone())
            .travel_request_repo(store.clone())
            .notification_repo(store.clone())
            .outbox_repo(store.clone())
            .store(store.clone())
            .sink(store.clone())
            .snowflake_generator(ids.clone())
            .thread_rules(rules)
            .retry_policy(RetryPolicy::new(3, Duration::ZERO))
            .build()
            .expect("all dependencies provided");

        Self { store, ctx, ids }
    }

    pub fn id(&self) -> Snowflake {
        self.ids.generate()
    }

    pub async fn user(&self, name: &str) -> Actor {
        self.user_with_role(name, Role::User).await
    }

    pub async fn admin(&self, name: &str) -> Actor {
        self.user_with_role(name, Role::Admin).await
    }

    async fn user_with_role(&self, name: &str, role: Role) -> Actor {
        let mut user = User::new(self.id(), name.to_string(), format!("{name}@example.com"));
        user.role = role;
        let actor = Actor::new(user.id, role);
        self.store.insert_user(user).await;
        actor
    }

    pub async fn post(&self, author: Actor) -> Snowflake {
        let post = Post::new(
            self.id(),
            author.id,
            "Lake trip".into(),
            "Notes from the lake".into(),
            PostCategory::Adventure,
        );
        let id = post.id;
        self.store.insert_post(post).await;
        id
    }

    pub async fn plan(&self, owner: Actor, status: TravelPlanStatus) -> Snowflake {
        let today = Utc::now().date_naive();
        let plan = TravelPlan {
            id: self.id(),
            owner_id: owner.id,
            start_location: "Dhaka".into(),
            destination: "Cox's Bazar".into(),
            start_date: today,
            end_date: today + chrono::Days::new(3),
            min_budget: 100,
            max_budget: 400,
            note: String::new(),
            status,
            created_at: Utc::now(),
        };
        let id = plan.id;
        self.store.insert_plan(plan).await;
        id
    }

    /// Outbox events queued so far, oldest first
    pub async fn outbox(&self) -> Vec<NotificationEvent> {
        self.store
            .snapshot()
            .await
            .outbox
            .into_iter()
            .map(|row| row.entry.event)
            .collect()
    }

    /// Assert every counter equals the count of edges it summarizes
    pub async fn assert_counters_match_edges(&self) {
        let state = self.store.snapshot().await;

        for post in state.posts.values() {
            assert_eq!(post.upvote_count, state.vote_count(post.id, VoteKind::Upvote), "upvotes of {}", post.id);
            assert_eq!(post.downvote_count, state.vote_count(post.id, VoteKind::Downvote), "downvotes of {}", post.id);
        }
        for user in state.users.values() {
            let followers = state.follows.values().filter(|f| f.following_id == user.id).count() as i64;
            let following = state.follows.values().filter(|f| f.follower_id == user.id).count() as i64;
            assert_eq!(user.follower_count, followers, "followers of {}", user.id);
            assert_eq!(user.following_count, following, "following of {}", user.id);
        }
        for comment in state.comments.values() {
            let replies = state
                .comments
                .values()
                .filter(|c| c.parent_id == Some(comment.id))
                .count() as i64;
            assert_eq!(comment.reply_count, replies, "replies of {}", comment.id);
        }
    }
}
