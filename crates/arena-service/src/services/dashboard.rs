//! Dashboard service: the signed-in landing page

use std::collections::{HashMap, HashSet};

use arena_core::rules::time_ago;
use arena_core::{Challenge, Membership, Snowflake, User};
use tracing::instrument;

use crate::dto::{
    CompletedChallenge, DashboardChallenge, DashboardResponse, DashboardStats, RecentActivity,
};

use super::challenge::display_name_of;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::lifecycle::LifecycleService;

const RECENT_ACTIVITY: i64 = 5;

/// Dashboard service
pub struct DashboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DashboardService<'a> {
    /// Create a new DashboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn overview(&self, user: &User) -> ServiceResult<DashboardResponse> {
        LifecycleService::new(self.ctx).check_completed(user).await?;

        let now = self.ctx.now();
        let today = user.timezone.today(now);

        let challenges = self.ctx.challenge_repo().list_for_member(user.id).await?;
        let memberships: HashMap<Snowflake, Membership> = self
            .ctx
            .membership_repo()
            .list_by_user(user.id)
            .await?
            .into_iter()
            .map(|m| (m.challenge_id, m))
            .collect();

        let people: Vec<Snowflake> = challenges
            .iter()
            .flat_map(|c| [Some(c.creator_id), c.winner_id])
            .flatten()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let users: HashMap<Snowflake, User> = self
            .ctx
            .user_repo()
            .find_many(&people)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut active = Vec::new();
        let mut completed = Vec::new();
        for challenge in &challenges {
            let Some(membership) = memberships.get(&challenge.id) else {
                continue;
            };
            let member_count = self
                .ctx
                .membership_repo()
                .count_by_challenge(challenge.id)
                .await?;
            let creator_name = display_name_of(users.get(&challenge.creator_id));

            if challenge.is_completed {
                completed.push(completed_entry(
                    challenge,
                    membership,
                    creator_name,
                    challenge.winner_id.map(|w| display_name_of(users.get(&w))),
                    member_count,
                ));
            } else {
                let checked_in_today = self
                    .ctx
                    .checkin_repo()
                    .find_on(challenge.id, user.id, today)
                    .await?
                    .is_some();
                active.push(active_entry(challenge, membership, creator_name, member_count, checked_in_today));
            }
        }

        let stats = DashboardStats {
            total_points: memberships.values().map(|m| m.points).sum(),
            best_current_streak: active.iter().map(|c| c.current_streak).max().unwrap_or(0),
            all_time_best_streak: memberships.values().map(|m| m.best_streak).max().unwrap_or(0),
            active_challenges: active.len(),
        };

        let names: HashMap<Snowflake, &str> = challenges.iter().map(|c| (c.id, c.name.as_str())).collect();
        let recent_activity = self
            .ctx
            .checkin_repo()
            .recent_by_user(user.id, RECENT_ACTIVITY)
            .await?
            .into_iter()
            .map(|c| RecentActivity {
                checkin_date: c.checkin_date,
                created_at: c.created_at,
                time_ago: time_ago(c.created_at, now),
                challenge_name: names.get(&c.challenge_id).copied().unwrap_or("Unknown").to_string(),
                note: c.note,
                photo_url: c.photo_url,
            })
            .collect();

        Ok(DashboardResponse {
            today_done: active.iter().filter(|c| c.checked_in_today).count(),
            today_total: active.len(),
            challenges: active,
            completed_challenges: completed,
            stats,
            recent_activity,
            today,
        })
    }
}

fn active_entry(
    challenge: &Challenge,
    membership: &Membership,
    creator_name: String,
    member_count: i64,
    checked_in_today: bool,
) -> DashboardChallenge {
    DashboardChallenge {
        id: challenge.id,
        name: challenge.name.clone(),
        description: challenge.description.clone(),
        join_code: challenge.join_code.to_string(),
        verification_type: challenge.verification_type,
        end_date: challenge.end_date,
        points_per_checkin: challenge.points_per_checkin,
        streak_bonus: challenge.streak_bonus,
        creator_name,
        member_count,
        points: membership.points,
        current_streak: membership.current_streak,
        best_streak: membership.best_streak,
        checked_in_today,
    }
}

fn completed_entry(
    challenge: &Challenge,
    membership: &Membership,
    creator_name: String,
    winner_name: Option<String>,
    member_count: i64,
) -> CompletedChallenge {
    CompletedChallenge {
        id: challenge.id,
        name: challenge.name.clone(),
        end_date: challenge.end_date,
        creator_name,
        winner_name,
        member_count,
        points: membership.points,
        current_streak: membership.current_streak,
        best_streak: membership.best_streak,
    }
}
