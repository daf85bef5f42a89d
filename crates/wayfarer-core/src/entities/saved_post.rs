//! Saved post edge - a user's bookmark; carries no counter

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPost {
    pub user_id: Snowflake,
    pub post_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl SavedPost {
    pub fn new(user_id: Snowflake, post_id: Snowflake) -> Self {
        Self {
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}
