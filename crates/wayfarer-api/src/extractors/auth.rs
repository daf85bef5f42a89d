//! Authentication extractor
//!
//! Validates the bearer token and turns its claims into the service-layer [`Actor`].

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use wayfarer_common::AppError;
use wayfarer_core::{Role, Snowflake};
use wayfarer_service::Actor;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Snowflake,
    pub role: Role,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

impl From<AuthUser> for Actor {
    fn from(auth: AuthUser) -> Self {
        auth.actor()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let claims = app_state.jwt_service().validate(bearer.token()).map_err(|e| {
            tracing::warn!(error = %e, "Rejected access token");
            e
        })?;
        let user_id = claims.user_id()?;

        Ok(AuthUser {
            user_id,
            role: claims.role,
        })
    }
}
