//! Reactions on check-ins

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// The fixed set of reactions, stored as HTML entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReactionKind {
    #[serde(rename = "&#128077;")]
    ThumbsUp,
    #[serde(rename = "&#128293;")]
    Fire,
    #[serde(rename = "&#128170;")]
    Muscle,
    #[serde(rename = "&#127881;")]
    Party,
}

impl ReactionKind {
    pub const ALL: [Self; 4] = [Self::ThumbsUp, Self::Fire, Self::Muscle, Self::Party];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThumbsUp => "&#128077;",
            Self::Fire => "&#128293;",
            Self::Muscle => "&#128170;",
            Self::Party => "&#127881;",
        }
    }

    /// Accepts the stored entity form or the literal emoji.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value || kind.emoji() == value)
            .ok_or(DomainError::InvalidReaction)
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::ThumbsUp => "\u{1F44D}",
            Self::Fire => "\u{1F525}",
            Self::Muscle => "\u{1F4AA}",
            Self::Party => "\u{1F389}",
        }
    }
}

/// A single user's reaction on a check-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinReaction {
    pub checkin_id: Snowflake,
    pub user_id: Snowflake,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl CheckinReaction {
    pub fn new(checkin_id: Snowflake, user_id: Snowflake, kind: ReactionKind) -> Self {
        Self {
            checkin_id,
            user_id,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Aggregated count of one reaction kind on one check-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSummary {
    pub checkin_id: Snowflake,
    pub kind: ReactionKind,
    pub count: i64,
    pub user_reacted: bool,
}

/// Outcome of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionToggle {
    pub added: bool,
    pub count: i64,
}
