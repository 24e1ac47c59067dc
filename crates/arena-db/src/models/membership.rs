//! Challenge membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for challenge_members table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub id: i64,
    pub challenge_id: i64,
    pub user_id: i64,
    pub points: i64,
    pub current_streak: i32,
    pub best_streak: i32,
    pub streak_freezes: i32,
    pub freezes_used: i32,
    pub joined_at: DateTime<Utc>,
}
