use async_trait::async_trait;

use arena_core::{PortResult, RateDecision, RateLimitPolicy, RateLimiter};

use crate::pool::RedisPool;

const RATE_LIMIT_PREFIX: &str = "rate_limit:";

/// Counters shared by every server instance through Redis
#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: RedisPool,
}

impl RedisRateLimiter {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn counter_key(key: &str) -> String {
        format!("{RATE_LIMIT_PREFIX}{key}")
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn hit(&self, key: &str, policy: &RateLimitPolicy) -> PortResult<RateDecision> {
        let (count, ttl) = self
            .pool
            .hit_window(&Self::counter_key(key), policy.window_secs)
            .await?;
        let decision = super::decide(count, policy, ttl);
        if !decision.allowed {
            tracing::debug!(key = %key, policy = policy.name, count, "Rate limit exceeded");
        }
        Ok(decision)
    }
}
