//! Comment model -> entity mapper

use wayfarer_core::entities::Comment;
use wayfarer_core::value_objects::Snowflake;

use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            author_id: Snowflake::new(model.author_id),
            parent_id: model.parent_id.map(Snowflake::new),
            depth: model.depth,
            reply_count: model.reply_count,
            content: model.content,
            is_deleted: model.is_deleted,
            is_edited: model.is_edited,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
