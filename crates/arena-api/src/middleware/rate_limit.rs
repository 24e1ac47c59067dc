//! Per-route rate limiting over the swappable [`RateLimiter`] port
//!
//! Counters are keyed by policy name and client address, so each limited
//! route family gets its own budget per client.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use arena_common::AppError;
use arena_core::{RateLimitPolicy, RateLimiter};
use tracing::{error, warn};

use crate::response::ApiError;

pub const AUTH: RateLimitPolicy = RateLimitPolicy::per_minute("auth", 5);
pub const CHECKIN: RateLimitPolicy = RateLimitPolicy::per_minute("checkin", 10);
pub const REACTION: RateLimitPolicy = RateLimitPolicy::per_minute("reaction", 30);
pub const COMMENT: RateLimitPolicy = RateLimitPolicy::per_minute("comment", 10);
pub const NUDGE: RateLimitPolicy = RateLimitPolicy::per_minute("nudge", 20);
pub const PROFILE_EDIT: RateLimitPolicy = RateLimitPolicy::per_minute("profile_edit", 10);
pub const PHOTO_UPLOAD: RateLimitPolicy = RateLimitPolicy::per_minute("photo_upload", 5);

/// Limiter and policy carried as middleware state
#[derive(Clone)]
pub struct RouteLimit {
    limiter: Arc<dyn RateLimiter>,
    policy: RateLimitPolicy,
}

impl RouteLimit {
    pub fn new(limiter: Arc<dyn RateLimiter>, policy: RateLimitPolicy) -> Self {
        Self { limiter, policy }
    }
}

/// Wrap a method router with a rate limit
pub fn limited<S>(route: MethodRouter<S>, limiter: &Arc<dyn RateLimiter>, policy: RateLimitPolicy) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(from_fn_with_state(RouteLimit::new(Arc::clone(limiter), policy), rate_limit))
}

/// Client address: first `X-Forwarded-For` hop when behind a proxy, else the peer
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(State(limit): State<RouteLimit>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(request.headers(), peer);
    let key = format!("{}:{client}", limit.policy.name);

    let decision = match limit.limiter.hit(&key, &limit.policy).await {
        Ok(decision) => decision,
        Err(e) => {
            // Fail open when the counter store is unreachable
            error!(error = %e, policy = limit.policy.name, "Rate limiter unavailable, allowing request");
            return next.run(request).await;
        }
    };

    if !decision.allowed {
        warn!(policy = limit.policy.name, client = %client, reset_after = decision.reset_after, "Rate limit exceeded");
        let mut response = ApiError::from(AppError::RateLimitExceeded).into_response();
        set_limit_headers(response.headers_mut(), &limit.policy, decision.remaining, decision.reset_after);
        return response;
    }

    let mut response = next.run(request).await;
    set_limit_headers(response.headers_mut(), &limit.policy, decision.remaining, decision.reset_after);
    response
}

fn set_limit_headers(headers: &mut HeaderMap, policy: &RateLimitPolicy, remaining: u32, reset_after: u64) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(policy.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(reset_after));
}
