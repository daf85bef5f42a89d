//! Vote database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for post_votes table
#[derive(Debug, Clone, FromRow)]
pub struct VoteModel {
    pub post_id: i64,
    pub user_id: i64,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
