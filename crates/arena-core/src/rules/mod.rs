//! Business rules - pure functions over entities

mod achievements;
mod activity;
mod standings;
mod streak;

pub use achievements::newly_earned;
pub use activity::{
    activity_calendar, digest_windows, time_ago, weekly_digest, CalendarDay, WeeklyDigest,
    CALENDAR_DAYS,
};
pub use standings::{leaderboard_order, select_winner, MilestoneProgress};
pub use streak::{calculate, preview, CheckinPreview, StreakInput, StreakOutcome, FREEZE_INTERVAL};
