//! Streak and points calculation for a single check-in
//!
//! Pure arithmetic over the membership's prior state. Persistence applies the
//! outcome; nothing here touches storage or the clock.

use serde::Serialize;

/// Freezes are awarded each time the streak reaches a multiple of this.
pub const FREEZE_INTERVAL: i32 = 7;

/// Prior state and challenge rules feeding the calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakInput {
    pub current_streak: i32,
    pub streak_freezes: i32,
    pub checked_in_yesterday: bool,
    pub points_per_checkin: i32,
    pub streak_bonus: i32,
}

/// Result of scoring one check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakOutcome {
    pub new_streak: i32,
    pub points_earned: i64,
    pub freeze_used: bool,
    pub freezes_earned: i32,
}

/// Score a check-in.
///
/// - checked in yesterday: streak + 1
/// - missed, streak > 0 and a freeze available: streak + 1, one freeze spent
/// - otherwise: streak restarts at 1
///
/// Points are `base + bonus * (streak - 1)`. One freeze is earned for every
/// multiple of [`FREEZE_INTERVAL`] crossed between the old and new streak.
pub fn calculate(input: &StreakInput) -> StreakOutcome {
    let (new_streak, freeze_used) = if input.checked_in_yesterday {
        (input.current_streak + 1, false)
    } else if input.current_streak > 0 && input.streak_freezes > 0 {
        (input.current_streak + 1, true)
    } else {
        (1, false)
    };

    let mut points_earned = i64::from(input.points_per_checkin);
    if new_streak > 1 {
        points_earned += i64::from(input.streak_bonus) * i64::from(new_streak - 1);
    }

    let freezes_earned =
        (new_streak / FREEZE_INTERVAL - input.current_streak / FREEZE_INTERVAL).max(0);

    StreakOutcome {
        new_streak,
        points_earned,
        freeze_used,
        freezes_earned,
    }
}

/// What the next check-in would yield, shown before the user submits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckinPreview {
    pub streak: i32,
    pub points: i64,
    pub freeze_will_be_used: bool,
    pub next_freeze_at: i32,
    pub days_to_next_freeze: i32,
}

pub fn preview(input: &StreakInput) -> CheckinPreview {
    let outcome = calculate(input);
    let next_freeze_at = (input.current_streak / FREEZE_INTERVAL + 1) * FREEZE_INTERVAL;
    CheckinPreview {
        streak: outcome.new_streak,
        points: outcome.points_earned,
        freeze_will_be_used: outcome.freeze_used,
        next_freeze_at,
        days_to_next_freeze: next_freeze_at - input.current_streak,
    }
}
