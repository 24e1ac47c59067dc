//! Membership entity - a user's standing within one challenge

use chrono::{DateTime, Utc};

use crate::rules::StreakOutcome;
use crate::value_objects::Snowflake;

/// Per-challenge score state. One per (challenge, user).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: Snowflake,
    pub challenge_id: Snowflake,
    pub user_id: Snowflake,
    pub points: i64,
    pub current_streak: i32,
    pub best_streak: i32,
    pub streak_freezes: i32,
    pub freezes_used: i32,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(id: Snowflake, challenge_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            id,
            challenge_id,
            user_id,
            points: 0,
            current_streak: 0,
            best_streak: 0,
            streak_freezes: 0,
            freezes_used: 0,
            joined_at: Utc::now(),
        }
    }

    /// State after a check-in scored as `outcome`
    pub fn applied(&self, outcome: &StreakOutcome) -> Self {
        let spent = i32::from(outcome.freeze_used);
        Self {
            points: self.points + outcome.points_earned,
            current_streak: outcome.new_streak,
            best_streak: self.best_streak.max(outcome.new_streak),
            streak_freezes: (self.streak_freezes + outcome.freezes_earned - spent).max(0),
            freezes_used: self.freezes_used + spent,
            ..self.clone()
        }
    }
}
