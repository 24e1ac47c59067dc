//! Achievement definitions and earned records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Statistic an achievement threshold is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    TotalCheckins,
    Streak,
    TotalPoints,
    ChallengesJoined,
    ChallengesCreated,
    PhotoCheckins,
}

impl ConditionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TotalCheckins => "total_checkins",
            Self::Streak => "streak",
            Self::TotalPoints => "total_points",
            Self::ChallengesJoined => "challenges_joined",
            Self::ChallengesCreated => "challenges_created",
            Self::PhotoCheckins => "photo_checkins",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "total_checkins" => Some(Self::TotalCheckins),
            "streak" => Some(Self::Streak),
            "total_points" => Some(Self::TotalPoints),
            "challenges_joined" => Some(Self::ChallengesJoined),
            "challenges_created" => Some(Self::ChallengesCreated),
            "photo_checkins" => Some(Self::PhotoCheckins),
            _ => None,
        }
    }
}

/// Achievement definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition: ConditionType,
    pub threshold: i64,
}

/// Record of a user having earned an achievement. Never revoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAchievement {
    pub user_id: Snowflake,
    pub achievement_id: Snowflake,
    pub earned_at: DateTime<Utc>,
}

impl UserAchievement {
    pub fn new(user_id: Snowflake, achievement_id: Snowflake) -> Self {
        Self {
            user_id,
            achievement_id,
            earned_at: Utc::now(),
        }
    }
}

/// Aggregates a user is measured by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AchievementStats {
    pub total_checkins: i64,
    /// Best streak across all memberships
    pub best_streak: i64,
    /// Sum of membership points
    pub total_points: i64,
    pub challenges_joined: i64,
    pub challenges_created: i64,
    pub photo_checkins: i64,
}

impl AchievementStats {
    pub fn value_for(&self, condition: ConditionType) -> i64 {
        match condition {
            ConditionType::TotalCheckins => self.total_checkins,
            ConditionType::Streak => self.best_streak,
            ConditionType::TotalPoints => self.total_points,
            ConditionType::ChallengesJoined => self.challenges_joined,
            ConditionType::ChallengesCreated => self.challenges_created,
            ConditionType::PhotoCheckins => self.photo_checkins,
        }
    }
}
