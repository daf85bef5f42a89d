//! Toggle state machine for votes and follows
//!
//! Given the edge state read inside a transaction and the requested action, these
//! pure functions decide the edge mutation and the counter deltas that must be
//! applied with it. Storage applies the result; nothing here touches storage.
//!
//! ```text
//! votes:   NONE + K -> K      (+1 K)
//!          K    + K -> NONE   (-1 K)
//!          A    + B -> B      (-1 A, +1 B)
//! follows: NONE      -> FOLLOWING   (+1 followers, +1 following)
//!          FOLLOWING -> NONE        (-1 followers, -1 following)
//! ```

use serde::Serialize;

use crate::entities::VoteKind;
use crate::error::DomainError;
use crate::value_objects::{CounterDelta, CounterField, Snowflake};

/// What a toggle did to the edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Added,
    Removed,
    Switched,
}

impl ToggleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Switched => "switched",
        }
    }
}

/// Edge change to apply; `K` is the edge's payload (`()` for plain presence edges).
///
/// Update and delete carry the state they expect to find, so the store can apply
/// them conditionally and report a conflict if a concurrent writer got there first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMutation<K = ()> {
    Insert(K),
    Update { from: K, to: K },
    Delete(K),
}

/// Outcome of toggling a vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTransition {
    pub action: ToggleAction,
    pub edge: EdgeMutation<VoteKind>,
    pub deltas: Vec<CounterDelta>,
    /// Vote the user holds after the transition
    pub resulting: Option<VoteKind>,
}

impl VoteTransition {
    pub fn decide(post_id: Snowflake, existing: Option<VoteKind>, requested: VoteKind) -> Self {
        match existing {
            None => Self {
                action: ToggleAction::Added,
                edge: EdgeMutation::Insert(requested),
                deltas: vec![CounterDelta::increment(post_id, requested.counter())],
                resulting: Some(requested),
            },
            Some(current) if current == requested => Self {
                action: ToggleAction::Removed,
                edge: EdgeMutation::Delete(current),
                deltas: vec![CounterDelta::decrement(post_id, current.counter())],
                resulting: None,
            },
            Some(current) => Self {
                action: ToggleAction::Switched,
                edge: EdgeMutation::Update {
                    from: current,
                    to: requested,
                },
                deltas: vec![
                    CounterDelta::decrement(post_id, current.counter()),
                    CounterDelta::increment(post_id, requested.counter()),
                ],
                resulting: Some(requested),
            },
        }
    }

    /// Only a fresh upvote notifies the author; removals and switches stay quiet
    pub fn notifies_author(&self) -> bool {
        self.action == ToggleAction::Added && self.resulting == Some(VoteKind::Upvote)
    }
}

/// Outcome of toggling a follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowTransition {
    pub action: ToggleAction,
    pub edge: EdgeMutation,
    pub deltas: Vec<CounterDelta>,
    pub following: bool,
}

impl FollowTransition {
    pub fn decide(
        follower_id: Snowflake,
        following_id: Snowflake,
        currently_following: bool,
    ) -> Result<Self, DomainError> {
        if follower_id == following_id {
            return Err(DomainError::CannotFollowSelf);
        }

        let transition = if currently_following {
            Self {
                action: ToggleAction::Removed,
                edge: EdgeMutation::Delete(()),
                deltas: vec![
                    CounterDelta::decrement(following_id, CounterField::UserFollowers),
                    CounterDelta::decrement(follower_id, CounterField::UserFollowing),
                ],
                following: false,
            }
        } else {
            Self {
                action: ToggleAction::Added,
                edge: EdgeMutation::Insert(()),
                deltas: vec![
                    CounterDelta::increment(following_id, CounterField::UserFollowers),
                    CounterDelta::increment(follower_id, CounterField::UserFollowing),
                ],
                following: true,
            }
        };
        Ok(transition)
    }
}

/// Presence toggle with no counters (saved posts)
pub fn toggle_presence(currently_present: bool) -> (ToggleAction, EdgeMutation) {
    if currently_present {
        (ToggleAction::Removed, EdgeMutation::Delete(()))
    } else {
        (ToggleAction::Added, EdgeMutation::Insert(()))
    }
}
