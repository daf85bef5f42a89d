//! Post model -> entity mapper

use wayfarer_core::entities::{Post, PostCategory};
use wayfarer_core::value_objects::Snowflake;

use crate::models::PostModel;

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            title: model.title,
            content: model.content,
            // Legacy free-text categories collapse into Other
            category: PostCategory::parse(&model.category).unwrap_or_default(),
            premium: model.premium,
            upvote_count: model.upvote_count,
            downvote_count: model.downvote_count,
            is_deleted: model.is_deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
