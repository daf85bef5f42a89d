//! Vote model -> entity mapper

use wayfarer_core::entities::{Vote, VoteKind};
use wayfarer_core::value_objects::Snowflake;
use wayfarer_core::DomainError;

use super::unknown_value;
use crate::models::VoteModel;

impl TryFrom<VoteModel> for Vote {
    type Error = DomainError;

    fn try_from(model: VoteModel) -> Result<Self, Self::Error> {
        let kind = VoteKind::parse(&model.kind).ok_or_else(|| unknown_value("kind", &model.kind))?;
        Ok(Vote {
            post_id: Snowflake::new(model.post_id),
            user_id: Snowflake::new(model.user_id),
            kind,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
