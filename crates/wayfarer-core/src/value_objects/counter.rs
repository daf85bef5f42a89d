//! Denormalized counters and the increments applied to them
//!
//! A counter is only ever changed by adding a [`CounterDelta`] inside the same
//! transaction that changes the edge it summarizes. Nothing reads a counter,
//! adjusts it in memory, and writes it back.

use serde::Serialize;
use std::fmt;

use super::Snowflake;

/// Every counter column the interaction subsystem maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    PostUpvotes,
    PostDownvotes,
    UserFollowers,
    UserFollowing,
    CommentReplies,
}

impl CounterField {
    /// Table and column holding this counter
    pub const fn column(self) -> (&'static str, &'static str) {
        match self {
            Self::PostUpvotes => ("posts", "upvote_count"),
            Self::PostDownvotes => ("posts", "downvote_count"),
            Self::UserFollowers => ("users", "follower_count"),
            Self::UserFollowing => ("users", "following_count"),
            Self::CommentReplies => ("comments", "reply_count"),
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (table, column) = self.column();
        write!(f, "{table}.{column}")
    }
}

/// A signed increment to one counter on one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CounterDelta {
    pub document: Snowflake,
    pub field: CounterField,
    pub delta: i32,
}

impl CounterDelta {
    pub const fn new(document: Snowflake, field: CounterField, delta: i32) -> Self {
        Self {
            document,
            field,
            delta,
        }
    }

    pub const fn increment(document: Snowflake, field: CounterField) -> Self {
        Self::new(document, field, 1)
    }

    pub const fn decrement(document: Snowflake, field: CounterField) -> Self {
        Self::new(document, field, -1)
    }

    /// Fold deltas that target the same `(document, field)` and drop the ones that cancel out.
    ///
    /// Output is ordered by `(table, document, field)`. Row locks are taken per row, not per
    /// column, so every transaction updates the rows of one table in ascending id order.
    pub fn merge(deltas: &[CounterDelta]) -> Vec<CounterDelta> {
        let mut merged: Vec<CounterDelta> = Vec::with_capacity(deltas.len());
        for delta in deltas {
            match merged
                .iter_mut()
                .find(|d| d.document == delta.document && d.field == delta.field)
            {
                Some(existing) => existing.delta += delta.delta,
                None => merged.push(*delta),
            }
        }
        merged.retain(|d| d.delta != 0);
        merged.sort_by_key(|d| (d.field.column().0, d.document, d.field));
        merged
    }
}
