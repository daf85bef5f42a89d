//! User service
//!
//! Handles public profile reads.

use tracing::instrument;

use wayfarer_core::Snowflake;

use crate::dto::PublicUserResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::follow::active_user;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public profile with follow counters
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<PublicUserResponse> {
        let user = active_user(self.ctx, user_id).await?;
        Ok(PublicUserResponse::from(&user))
    }
}
