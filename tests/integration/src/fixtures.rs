//! Test fixtures and data generators

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Suffix that keeps usernames, emails and join codes unique across test runs
pub fn unique_suffix() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{}{n}", millis % 100_000_000)
}

// ============================================================================
// Auth Fixtures
// ============================================================================

/// Registration payload
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl RegisterRequest {
    /// Fresh account with a unique username and email
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("user{suffix}"),
            email: format!("user{suffix}@test.io"),
            password: "password123".to_string(),
            timezone: None,
        }
    }

    pub fn login(&self) -> LoginRequest {
        LoginRequest {
            login_id: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Login payload; `login_id` may be a username or an email
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub initial: String,
    pub timezone: String,
    pub total_points: i64,
    pub is_admin: bool,
    pub has_password: bool,
}

// ============================================================================
// Challenge Fixtures
// ============================================================================

/// Challenge creation payload
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateChallengeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_per_checkin: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl CreateChallengeRequest {
    pub fn named(name: &str) -> Self {
        Self {
            name: format!("{name} {}", unique_suffix()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeResponse {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    pub join_code: String,
    pub is_public: bool,
    pub points_per_checkin: i32,
    pub streak_bonus: i32,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub points: i64,
    pub current_streak: i32,
    pub checked_in_today: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckinResult {
    pub success: bool,
    pub checkin_id: String,
    pub points_earned: i64,
    pub new_streak: i32,
    pub achievements_earned: Vec<String>,
}
