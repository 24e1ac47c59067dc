use async_trait::async_trait;

use arena_core::{PortResult, RateDecision, RateLimitPolicy, RateLimiter};

/// Allows everything. Used when rate limiting is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimiter for NoopRateLimiter {
    async fn hit(&self, _key: &str, policy: &RateLimitPolicy) -> PortResult<RateDecision> {
        Ok(RateDecision {
            allowed: true,
            remaining: policy.limit,
            reset_after: policy.window_secs,
        })
    }
}
