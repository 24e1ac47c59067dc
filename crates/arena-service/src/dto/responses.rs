//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use arena_core::rules::{CalendarDay, CheckinPreview, MilestoneProgress, WeeklyDigest};
use arena_core::{ConditionType, NotificationKind, Snowflake, VerificationType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Outcome of an action that has nothing else to report
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

#[derive(Debug, Serialize)]
pub struct OAuthStartResponse {
    pub authorization_url: String,
    pub state: String,
}

// ============================================================================
// User Responses
// ============================================================================

/// The signed-in user, read fresh from storage on each request
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: Snowflake,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub profile_photo: Option<String>,
    pub avatar_url: Option<String>,
    pub initial: String,
    pub timezone: String,
    pub total_points: i64,
    pub is_admin: bool,
    pub has_password: bool,
    pub google_linked: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Challenge Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeResponse {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: Snowflake,
    pub join_code: String,
    pub is_public: bool,
    pub points_per_checkin: i32,
    pub penalty_per_miss: i32,
    pub streak_bonus: i32,
    pub verification_type: VerificationType,
    pub end_date: Option<NaiveDate>,
    pub milestone_target: Option<i32>,
    pub is_completed: bool,
    pub winner_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub points: i64,
    pub current_streak: i32,
    pub best_streak: i32,
    pub streak_freezes: i32,
    pub freezes_used: i32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: Snowflake,
    pub display_name: String,
    pub username: String,
    pub profile_photo: Option<String>,
    pub avatar_url: Option<String>,
    pub initial: String,
    pub points: i64,
    pub current_streak: i32,
    pub best_streak: i32,
    pub checked_in_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionSummaryResponse {
    pub reaction: &'static str,
    pub count: i64,
    pub user_reacted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckinResponse {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub display_name: String,
    pub author_initial: String,
    pub checkin_date: NaiveDate,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
    pub reactions: Vec<ReactionSummaryResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub display_name: String,
    pub author_initial: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
}

/// Everything the challenge page shows a member
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeViewResponse {
    pub challenge: ChallengeResponse,
    pub membership: MembershipResponse,
    pub member_count: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub checked_in_today: bool,
    pub checkin_time: Option<DateTime<Utc>>,
    pub recent_checkins: Vec<CheckinResponse>,
    pub comments: Vec<CommentResponse>,
    pub days_remaining: Option<i64>,
    pub milestone_progress: Option<MilestoneProgress>,
    pub checkin_preview: CheckinPreview,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploreEntry {
    #[serde(flatten)]
    pub challenge: ChallengeResponse,
    pub member_count: i64,
    pub creator_name: String,
}

// ============================================================================
// Check-in Responses
// ============================================================================

/// Result of recording a check-in
#[derive(Debug, Clone, Serialize)]
pub struct CheckinResultResponse {
    pub success: bool,
    pub message: String,
    pub checkin_id: Snowflake,
    pub checkin_date: NaiveDate,
    pub points_earned: i64,
    pub new_streak: i32,
    pub freeze_used: bool,
    pub freeze_earned: i32,
    pub achievements_earned: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReactionToggleResponse {
    pub count: i64,
    pub toggled: bool,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: Snowflake,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
}

// ============================================================================
// Achievement Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AchievementEntry {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition_type: ConditionType,
    pub condition_value: i64,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<AchievementEntry>,
    pub earned_count: usize,
    pub total_count: usize,
}

// ============================================================================
// Profile Responses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProfileStats {
    pub total_challenges: i64,
    pub total_points: i64,
    pub best_streak: i64,
    pub total_checkins: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user: CurrentUserResponse,
    pub stats: ProfileStats,
    pub calendar_days: Vec<CalendarDay>,
    pub weekly_digest: WeeklyDigest,
    pub achievements: Vec<AchievementEntry>,
}

// ============================================================================
// Dashboard Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DashboardChallenge {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub join_code: String,
    pub verification_type: VerificationType,
    pub end_date: Option<NaiveDate>,
    pub points_per_checkin: i32,
    pub streak_bonus: i32,
    pub creator_name: String,
    pub member_count: i64,
    pub points: i64,
    pub current_streak: i32,
    pub best_streak: i32,
    pub checked_in_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedChallenge {
    pub id: Snowflake,
    pub name: String,
    pub end_date: Option<NaiveDate>,
    pub creator_name: String,
    pub winner_name: Option<String>,
    pub member_count: i64,
    pub points: i64,
    pub current_streak: i32,
    pub best_streak: i32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardStats {
    pub total_points: i64,
    pub best_current_streak: i32,
    pub all_time_best_streak: i32,
    pub active_challenges: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    pub checkin_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
    pub challenge_name: String,
    pub note: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub challenges: Vec<DashboardChallenge>,
    pub completed_challenges: Vec<CompletedChallenge>,
    pub stats: DashboardStats,
    pub recent_activity: Vec<RecentActivity>,
    pub today: NaiveDate,
    pub today_done: usize,
    pub today_total: usize,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
