//! Comment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for challenge_comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub challenge_id: i64,
    pub user_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
