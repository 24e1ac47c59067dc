//! Authentication handlers
//!
//! Endpoints for registration, login, token refresh, logout, the current
//! user and external sign-in.

use axum::{
    extract::{Query, State},
    Json,
};
use arena_service::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, LogoutRequest, MessageResponse,
    OAuthCallbackQuery, OAuthStartResponse, RefreshTokenRequest, RegisterRequest,
};
use arena_service::AuthService;

use crate::extractors::{AuthUser, FormOrJson, ResponseMode};
use crate::response::{ApiResult, Negotiated};
use crate::state::AppState;

const AFTER_SIGN_IN: &str = "/dashboard";

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    mode: ResponseMode,
    FormOrJson(request): FormOrJson<RegisterRequest>,
) -> ApiResult<Negotiated<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Negotiated::created(mode, AFTER_SIGN_IN, response))
}

/// Login with username or e-mail
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    mode: ResponseMode,
    FormOrJson(request): FormOrJson<LoginRequest>,
) -> ApiResult<Negotiated<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Negotiated::new(mode, AFTER_SIGN_IN, response))
}

/// Refresh access token
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh_tokens(request).await?;
    Ok(Json(response))
}

/// Logout, revoking the current session and optionally a refresh token
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AuthService::new(state.service_context());
    let request = body.map(|Json(b)| b).unwrap_or_default();
    service.logout(&auth.0, request).await?;
    Ok(Json(MessageResponse::ok("Logged out.")))
}

/// Current user, read fresh from storage
///
/// GET /users/@me
pub async fn current_user(State(state): State<AppState>, auth: AuthUser) -> Json<CurrentUserResponse> {
    Json(AuthService::new(state.service_context()).current_user(&auth.0))
}

/// Begin external sign-in. Browsers are sent straight to the provider.
///
/// GET /auth/google
pub async fn google_start(
    State(state): State<AppState>,
    mode: ResponseMode,
) -> ApiResult<Negotiated<OAuthStartResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.google_start().await?;
    let location = response.authorization_url.clone();
    Ok(Negotiated::new(mode, location, response))
}

/// Provider redirect target
///
/// GET /auth/google/callback
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.google_callback(query).await?;
    Ok(Json(response))
}
