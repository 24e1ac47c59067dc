//! Request counters behind the [`arena_core::RateLimiter`] port.
//!
//! All backends count hits in fixed windows keyed by policy name and client.

mod memory;
mod noop;
mod redis;

pub use memory::MemoryRateLimiter;
pub use noop::NoopRateLimiter;
pub use redis::RedisRateLimiter;

use arena_core::{RateDecision, RateLimitPolicy};

/// Decision for the `count`-th hit in a window with `reset_after` seconds left
pub(crate) fn decide(count: u64, policy: &RateLimitPolicy, reset_after: u64) -> RateDecision {
    let limit = u64::from(policy.limit);
    RateDecision {
        allowed: count <= limit,
        remaining: limit.saturating_sub(count) as u32,
        reset_after,
    }
}
