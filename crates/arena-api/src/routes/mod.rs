//! Route definitions
//!
//! All API routes organized by area and mounted under /api/v1.

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use arena_core::RateLimiter;

use crate::handlers::{admin, auth, challenges, checkins, dashboard, health, notifications, profile, social};
use crate::middleware::rate_limit::{
    limited, AUTH, CHECKIN, COMMENT, NUDGE, PHOTO_UPLOAD, PROFILE_EDIT, REACTION,
};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router(limiter: &Arc<dyn RateLimiter>) -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes(limiter))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes(limiter: &Arc<dyn RateLimiter>) -> Router<AppState> {
    Router::new()
        .merge(auth_routes(limiter))
        .merge(challenge_routes(limiter))
        .merge(profile_routes(limiter))
        .merge(notification_routes())
        .merge(admin_routes())
}

/// Authentication routes
fn auth_routes(limiter: &Arc<dyn RateLimiter>) -> Router<AppState> {
    Router::new()
        .route("/auth/register", limited(post(auth::register), limiter, AUTH))
        .route("/auth/login", limited(post(auth::login), limiter, AUTH))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/google", get(auth::google_start))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/users/@me", get(auth::current_user))
}

/// Dashboard and challenge routes
fn challenge_routes(limiter: &Arc<dyn RateLimiter>) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/challenges", post(challenges::create_challenge))
        .route("/challenges/templates", get(challenges::templates))
        .route("/challenges/explore", get(challenges::explore))
        .route("/challenges/join", post(challenges::join_challenge))
        .route("/challenges/:challenge_id", get(challenges::view_challenge))
        .route("/challenges/:challenge_id/leaderboard", get(challenges::leaderboard))
        .route(
            "/challenges/:challenge_id/checkins",
            limited(post(checkins::create_checkin), limiter, CHECKIN),
        )
        .route(
            "/challenges/:challenge_id/reactions",
            limited(post(social::toggle_reaction), limiter, REACTION),
        )
        .route(
            "/challenges/:challenge_id/comments",
            limited(post(social::add_comment), limiter, COMMENT),
        )
        .route(
            "/challenges/:challenge_id/nudges/:user_id",
            limited(post(social::nudge), limiter, NUDGE),
        )
}

/// Profile routes
fn profile_routes(limiter: &Arc<dyn RateLimiter>) -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::overview).merge(limited(patch(profile::update), limiter, PROFILE_EDIT)),
        )
        .route(
            "/profile/photo",
            limited(post(profile::upload_photo), limiter, PHOTO_UPLOAD).merge(delete(profile::remove_photo)),
        )
        .route("/achievements", get(profile::achievements))
}

/// Notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::list))
        .route("/notifications/unread-count", get(notifications::unread_count))
}

/// Administration routes
fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/checkins/:checkin_id", delete(admin::delete_checkin))
}
