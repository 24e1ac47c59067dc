//! # arena-cache
//!
//! Redis-backed implementations of the session and rate limiting ports,
//! with in-memory counterparts for single-node runs and tests.
//!
//! ## Example
//!
//! ```ignore
//! use arena_cache::{RedisPool, RedisPoolConfig, RedisRateLimiter, RedisSessionStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let sessions = RedisSessionStore::new(pool.clone());
//! let limiter = RedisRateLimiter::new(pool);
//!
//! let policy = RateLimitPolicy::per_minute("login", 5);
//! let decision = limiter.hit("login:10.0.0.1", &policy).await?;
//! ```

pub mod pool;
pub mod rate_limit;
pub mod session;

use std::sync::Arc;

use arena_common::RateLimitBackend;
use arena_core::RateLimiter;

pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};
pub use rate_limit::{MemoryRateLimiter, NoopRateLimiter, RedisRateLimiter};
pub use session::{MemorySessionStore, RedisSessionStore};

/// Build the rate limiter selected by configuration
pub fn rate_limiter_for(backend: RateLimitBackend, pool: &RedisPool) -> Arc<dyn RateLimiter> {
    match backend {
        RateLimitBackend::Redis => Arc::new(RedisRateLimiter::new(pool.clone())),
        RateLimitBackend::Memory => Arc::new(MemoryRateLimiter::new()),
        RateLimitBackend::Disabled => Arc::new(NoopRateLimiter),
    }
}
