//! User model -> entity mapper

use wayfarer_core::entities::{Role, User};
use wayfarer_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            name: model.name,
            email: model.email,
            role: Role::parse(&model.role),
            is_verified: model.is_verified,
            premium_access: model.premium_access,
            follower_count: model.follower_count,
            following_count: model.following_count,
            is_deleted: model.is_deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
