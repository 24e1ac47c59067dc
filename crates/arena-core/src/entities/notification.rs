//! Notification entity and the messages the app sends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Achievement, Challenge};
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ChallengeActivity,
    ChallengeCompleted,
    AchievementEarned,
    Nudge,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChallengeActivity => "challenge_activity",
            Self::ChallengeCompleted => "challenge_completed",
            Self::AchievementEarned => "achievement_earned",
            Self::Nudge => "nudge",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "challenge_activity" => Some(Self::ChallengeActivity),
            "challenge_completed" => Some(Self::ChallengeCompleted),
            "achievement_earned" => Some(Self::AchievementEarned),
            "nudge" => Some(Self::Nudge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub const PAGE_SIZE: i64 = 50;

    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        kind: NotificationKind,
        title: &str,
        message: String,
        link: Option<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            title: title.to_string(),
            message,
            link,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Sent to a challenge's creator when someone joins
    pub fn member_joined(
        id: Snowflake,
        creator_id: Snowflake,
        joiner_name: &str,
        challenge: &Challenge,
    ) -> Self {
        Self::new(
            id,
            creator_id,
            NotificationKind::ChallengeActivity,
            "New Member",
            format!("{joiner_name} joined your challenge \"{}\".", challenge.name),
            Some(challenge_link(challenge.id)),
        )
    }

    /// Sent to every member when a challenge completes. `winner` is `None` for empty challenges.
    pub fn challenge_ended(
        id: Snowflake,
        member_id: Snowflake,
        challenge: &Challenge,
        winner: Option<(&str, i64)>,
    ) -> Self {
        let (name, points) = winner.unwrap_or(("No one", 0));
        Self::new(
            id,
            member_id,
            NotificationKind::ChallengeCompleted,
            "Challenge Ended",
            format!(
                "\"{}\" has ended. {name} won with {points} points.",
                challenge.name
            ),
            Some(challenge_link(challenge.id)),
        )
    }

    pub fn achievement_earned(id: Snowflake, user_id: Snowflake, achievement: &Achievement) -> Self {
        Self::new(
            id,
            user_id,
            NotificationKind::AchievementEarned,
            "Achievement Unlocked",
            format!(
                "You earned \"{}\" - {}",
                achievement.name, achievement.description
            ),
            Some("/achievements".to_string()),
        )
    }

    pub fn nudged(
        id: Snowflake,
        receiver_id: Snowflake,
        sender_name: &str,
        challenge: &Challenge,
    ) -> Self {
        Self::new(
            id,
            receiver_id,
            NotificationKind::Nudge,
            "You got nudged!",
            format!(
                "{sender_name} nudged you to check in to \"{}\". Don't break your streak!",
                challenge.name
            ),
            Some(challenge_link(challenge.id)),
        )
    }
}

fn challenge_link(id: Snowflake) -> String {
    format!("/challenges/{id}")
}
