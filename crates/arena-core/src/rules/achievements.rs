//! Matching achievement thresholds against user statistics

use std::collections::HashSet;

use crate::entities::{Achievement, AchievementStats};
use crate::value_objects::Snowflake;

/// Achievements whose threshold is met and that the user does not hold yet
pub fn newly_earned<'a>(
    catalog: &'a [Achievement],
    earned: &HashSet<Snowflake>,
    stats: &AchievementStats,
) -> Vec<&'a Achievement> {
    catalog
        .iter()
        .filter(|a| !earned.contains(&a.id))
        .filter(|a| stats.value_for(a.condition) >= a.threshold)
        .collect()
}
