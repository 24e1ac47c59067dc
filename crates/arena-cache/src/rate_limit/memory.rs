use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use arena_core::{PortResult, RateDecision, RateLimitPolicy, RateLimiter};

/// Per-process counters. Suitable for a single instance or tests.
#[derive(Default)]
pub struct MemoryRateLimiter {
    windows: DashMap<String, (Instant, u64)>,
}

impl MemoryRateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop windows that have already closed
    pub fn purge_expired(&self, max_window: Duration) {
        let now = Instant::now();
        self.windows
            .retain(|_, (started, _)| now.duration_since(*started) < max_window);
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn hit(&self, key: &str, policy: &RateLimitPolicy) -> PortResult<RateDecision> {
        let window = Duration::from_secs(policy.window_secs);
        let now = Instant::now();

        let mut entry = self.windows.entry(key.to_string()).or_insert((now, 0));
        if now.duration_since(entry.0) >= window {
            *entry = (now, 0);
        }
        entry.1 += 1;

        let elapsed = now.duration_since(entry.0);
        let reset_after = window.saturating_sub(elapsed).as_secs();
        Ok(super::decide(entry.1, policy, reset_after))
    }
}
