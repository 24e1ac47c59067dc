//! Challenge entity - a time-boxed habit that members check in to

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{JoinCode, Snowflake};

/// How a check-in proves compliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationType {
    #[default]
    None,
    PhotoOptional,
    PhotoRequired,
}

impl VerificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PhotoOptional => "photo_optional",
            Self::PhotoRequired => "photo_required",
        }
    }

    /// Unknown values fall back to [`VerificationType::None`].
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "photo_optional" => Self::PhotoOptional,
            "photo_required" => Self::PhotoRequired,
            _ => Self::None,
        }
    }
}

/// Challenge entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: Snowflake,
    pub join_code: JoinCode,
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

impl Challenge {
    pub const DEFAULT_POINTS: i32 = 10;
    pub const DEFAULT_PENALTY: i32 = 5;
    pub const DEFAULT_STREAK_BONUS: i32 = 5;

    /// Create a new challenge with default scoring rules
    pub fn new(id: Snowflake, name: String, creator_id: Snowflake, join_code: JoinCode) -> Self {
        Self {
            id,
            name,
            description: None,
            creator_id,
            join_code,
            is_public: false,
            points_per_checkin: Self::DEFAULT_POINTS,
            penalty_per_miss: Self::DEFAULT_PENALTY,
            streak_bonus: Self::DEFAULT_STREAK_BONUS,
            verification_type: VerificationType::None,
            end_date: None,
            milestone_target: None,
            is_completed: false,
            winner_id: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.creator_id == user_id
    }

    /// End date has passed relative to `today` and completion is still pending
    pub fn is_due_for_completion(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.end_date.is_some_and(|end| end < today)
    }

    /// Whole days until the end date, for open challenges with an end date
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        if self.is_completed {
            return None;
        }
        self.end_date.map(|end| (end - today).num_days())
    }
}
