//! Challenge database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for challenges table
#[derive(Debug, Clone, FromRow)]
pub struct ChallengeModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: i64,
    pub join_code: String,
    pub is_public: bool,
    pub points_per_checkin: i32,
    pub penalty_per_miss: i32,
    pub streak_bonus: i32,
    pub verification_type: String,
    pub end_date: Option<NaiveDate>,
    pub milestone_target: Option<i32>,
    pub is_completed: bool,
    pub winner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
