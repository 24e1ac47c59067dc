//! Achievement service
//!
//! Evaluates thresholds after any action that can move a statistic and
//! lists the catalog with the caller's progress.

use std::collections::{HashMap, HashSet};

use arena_core::rules::newly_earned;
use arena_core::{Achievement, Notification, Snowflake, UserAchievement};
use tracing::{info, instrument, warn};

use crate::dto::{AchievementEntry, AchievementsResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Achievement service
pub struct AchievementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AchievementService<'a> {
    /// Create a new AchievementService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Award every achievement whose threshold the user now meets.
    ///
    /// Awards are idempotent: an achievement already held is skipped by the
    /// repository, so concurrent evaluations never double-award.
    #[instrument(skip(self))]
    pub async fn evaluate(&self, user_id: Snowflake) -> ServiceResult<Vec<Achievement>> {
        let repo = self.ctx.achievement_repo();

        let catalog = repo.list_all().await?;
        let earned: HashSet<Snowflake> = repo
            .earned_by_user(user_id)
            .await?
            .into_iter()
            .map(|ua| ua.achievement_id)
            .collect();
        let stats = repo.user_stats(user_id).await?;

        let mut awarded = Vec::new();
        for achievement in newly_earned(&catalog, &earned, &stats) {
            let award = UserAchievement::new(user_id, achievement.id);
            let notification =
                Notification::achievement_earned(self.ctx.generate_id(), user_id, achievement);
            if repo.award(&award, &notification).await? {
                info!(user_id = %user_id, achievement = %achievement.name, "Achievement earned");
                awarded.push(achievement.clone());
            }
        }

        Ok(awarded)
    }

    /// Evaluate after a committed action. Failures are logged, never surfaced,
    /// since the action itself already succeeded.
    pub async fn evaluate_after(&self, user_id: Snowflake, action: &'static str) -> Vec<String> {
        match self.evaluate(user_id).await {
            Ok(awarded) => awarded.into_iter().map(|a| a.name).collect(),
            Err(e) => {
                warn!(user_id = %user_id, action, error = %e, "Achievement evaluation failed");
                Vec::new()
            }
        }
    }

    /// Whole catalog: earned first (newest first), then the rest by threshold
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Snowflake) -> ServiceResult<AchievementsResponse> {
        let repo = self.ctx.achievement_repo();
        let catalog = repo.list_all().await?;
        let earned: HashMap<Snowflake, UserAchievement> = repo
            .earned_by_user(user_id)
            .await?
            .into_iter()
            .map(|ua| (ua.achievement_id, ua))
            .collect();

        let mut entries: Vec<AchievementEntry> = catalog
            .iter()
            .map(|a| AchievementEntry::new(a, earned.get(&a.id)))
            .collect();
        entries.sort_by(|a, b| {
            b.earned
                .cmp(&a.earned)
                .then_with(|| b.earned_at.cmp(&a.earned_at))
                .then_with(|| a.condition_value.cmp(&b.condition_value))
        });

        let earned_count = entries.iter().filter(|e| e.earned).count();
        Ok(AchievementsResponse {
            total_count: entries.len(),
            earned_count,
            achievements: entries,
        })
    }

    /// Only the achievements the user holds, newest first
    pub async fn earned(&self, user_id: Snowflake) -> ServiceResult<Vec<AchievementEntry>> {
        Ok(self
            .list(user_id)
            .await?
            .achievements
            .into_iter()
            .filter(|e| e.earned)
            .collect())
    }
}
