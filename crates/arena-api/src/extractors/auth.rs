//! Authentication extractor
//!
//! Validates the bearer token from the Authorization header, then reads the
//! user record fresh from storage so profile edits show up immediately.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use arena_core::User;
use arena_service::{AuthService, AuthenticatedUser};

use crate::response::ApiError;
use crate::state::AppState;

/// Signed-in caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl AuthUser {
    pub fn user(&self) -> &User {
        &self.0.user
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
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let caller = AuthService::new(app_state.service_context())
            .authenticate(bearer.token())
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "Rejected access token"))?;

        Ok(AuthUser(caller))
    }
}
