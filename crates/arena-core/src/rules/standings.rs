//! Ordering members: leaderboard ranks, challenge winners and milestone progress

use std::cmp::Ordering;

use serde::Serialize;

use crate::entities::Membership;

/// Leaderboard order: points, then current streak (both descending), then
/// earliest join, then lowest user id.
pub fn leaderboard_order(a: &Membership, b: &Membership) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.current_streak.cmp(&a.current_streak))
        .then_with(|| a.joined_at.cmp(&b.joined_at))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Winner of a finished challenge: most points, ties go to the earliest
/// joiner and then to the lowest user id.
pub fn select_winner(members: &[Membership]) -> Option<&Membership> {
    members.iter().min_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.joined_at.cmp(&b.joined_at))
            .then_with(|| a.user_id.cmp(&b.user_id))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneProgress {
    pub current: i64,
    pub target: i64,
    pub percent: i64,
}

impl MilestoneProgress {
    /// `None` when the challenge has no positive target
    pub fn new(current: i64, target: Option<i32>) -> Option<Self> {
        let target = i64::from(target.filter(|t| *t > 0)?);
        let percent = ((current as f64 / target as f64) * 100.0).round() as i64;
        Some(Self {
            current,
            target,
            percent: percent.min(100),
        })
    }
}
