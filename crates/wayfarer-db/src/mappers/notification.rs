//! Notification / outbox model -> entity mappers

use wayfarer_core::entities::{Notification, NotificationKind, ResourceType};
use wayfarer_core::events::{NotificationEvent, OutboxEntry};
use wayfarer_core::value_objects::Snowflake;
use wayfarer_core::DomainError;

use super::unknown_value;
use crate::models::{NotificationModel, OutboxModel};

fn parse_kind(value: &str) -> Result<NotificationKind, DomainError> {
    NotificationKind::parse(value).ok_or_else(|| unknown_value("kind", value))
}

fn parse_resource_type(value: &str) -> Result<ResourceType, DomainError> {
    ResourceType::parse(value).ok_or_else(|| unknown_value("resource_type", value))
}

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: Snowflake::new(model.id),
            recipient_id: Snowflake::new(model.recipient_id),
            sender_id: Snowflake::new(model.sender_id),
            kind: parse_kind(&model.kind)?,
            resource_type: parse_resource_type(&model.resource_type)?,
            resource_id: Snowflake::new(model.resource_id),
            is_read: model.is_read,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<OutboxModel> for OutboxEntry {
    type Error = DomainError;

    fn try_from(model: OutboxModel) -> Result<Self, Self::Error> {
        Ok(OutboxEntry {
            id: Snowflake::new(model.id),
            event: NotificationEvent {
                recipient_id: Snowflake::new(model.recipient_id),
                sender_id: Snowflake::new(model.sender_id),
                kind: parse_kind(&model.kind)?,
                resource_type: parse_resource_type(&model.resource_type)?,
                resource_id: Snowflake::new(model.resource_id),
            },
            attempts: model.attempts,
            created_at: model.created_at,
        })
    }
}
