//! Ports to services outside the database: rate counting, session storage,
//! image hosting and the external identity provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{HostedImage, ImageUpload, Snowflake, UploadTarget};

/// Result type for port operations
pub type PortResult<T> = Result<T, DomainError>;

// ============================================================================
// Rate limiting
// ============================================================================

/// A named request budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub name: &'static str,
    pub limit: u32,
    pub window_secs: u64,
}

impl RateLimitPolicy {
    pub const fn per_minute(name: &'static str, limit: u32) -> Self {
        Self {
            name,
            limit,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u32,
    /// Seconds until the window resets
    pub reset_after: u64,
}

/// Counts hits per key within a policy window
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn hit(&self, key: &str, policy: &RateLimitPolicy) -> PortResult<RateDecision>;
}

// ============================================================================
// Sessions
// ============================================================================

/// A live refresh session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: Snowflake,
    pub session_id: String,
    /// Unix seconds
    pub created_at: i64,
}

impl SessionRecord {
    pub fn new(user_id: Snowflake, session_id: String) -> Self {
        Self {
            user_id,
            session_id,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn store_session(&self, record: &SessionRecord, ttl_secs: u64) -> PortResult<()>;

    async fn get_session(&self, session_id: &str) -> PortResult<Option<SessionRecord>>;

    async fn revoke_session(&self, session_id: &str) -> PortResult<bool>;

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> PortResult<u32>;

    /// Remember an OAuth `state` value
    async fn store_oauth_state(&self, state: &str, ttl_secs: u64) -> PortResult<()>;

    /// Consume an OAuth `state`; `true` only the first time for a stored value
    async fn take_oauth_state(&self, state: &str) -> PortResult<bool>;
}

// ============================================================================
// Image host
// ============================================================================

#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, image: &ImageUpload, target: &UploadTarget) -> PortResult<HostedImage>;

    /// Returns whether the host reported the image as deleted
    async fn delete(&self, public_id: &str) -> PortResult<bool>;
}

// ============================================================================
// Identity provider
// ============================================================================

/// Profile returned by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent page URL carrying `state`
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for the user's profile
    async fn exchange_code(&self, code: &str) -> PortResult<ExternalIdentity>;
}
