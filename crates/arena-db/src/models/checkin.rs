//! Check-in database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for checkins table
#[derive(Debug, Clone, FromRow)]
pub struct CheckinModel {
    pub id: i64,
    pub challenge_id: i64,
    pub user_id: i64,
    pub checkin_date: NaiveDate,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-day check-in count (from query)
#[derive(Debug, Clone, FromRow)]
pub struct DailyCountModel {
    pub checkin_date: NaiveDate,
    pub count: i64,
}
