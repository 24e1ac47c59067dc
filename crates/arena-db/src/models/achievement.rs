//! Achievement database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for achievements table
#[derive(Debug, Clone, FromRow)]
pub struct AchievementModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition_type: String,
    pub condition_value: i64,
}

/// Database model for user_achievements table
#[derive(Debug, Clone, FromRow)]
pub struct UserAchievementModel {
    pub user_id: i64,
    pub achievement_id: i64,
    pub earned_at: DateTime<Utc>,
}

/// Aggregate statistics for one user (from query)
#[derive(Debug, Clone, FromRow)]
pub struct AchievementStatsModel {
    pub total_checkins: i64,
    pub best_streak: i64,
    pub total_points: i64,
    pub challenges_joined: i64,
    pub challenges_created: i64,
    pub photo_checkins: i64,
}
