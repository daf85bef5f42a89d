//! Notification and outbox database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notifications table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub recipient_id: i64,
    pub sender_id: i64,
    pub kind: String,
    pub resource_type: String,
    pub resource_id: i64,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Claimed row of the notification_outbox table
#[derive(Debug, Clone, FromRow)]
pub struct OutboxModel {
    pub id: i64,
    pub recipient_id: i64,
    pub sender_id: i64,
    pub kind: String,
    pub resource_type: String,
    pub resource_id: i64,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
}
