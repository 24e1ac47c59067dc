//! PostgreSQL implementation of AchievementRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use arena_core::entities::{Achievement, AchievementStats, Notification, UserAchievement};
use arena_core::traits::{AchievementRepository, RepoResult};
use arena_core::value_objects::Snowflake;

use crate::mappers::achievement_from_model;
use crate::models::{AchievementModel, AchievementStatsModel, UserAchievementModel};

use super::error::map_db_error;
use super::notification::insert_notification;

/// PostgreSQL implementation of AchievementRepository
#[derive(Clone)]
pub struct PgAchievementRepository {
    pool: PgPool,
}

impl PgAchievementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AchievementRepository for PgAchievementRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<Achievement>> {
        let results = sqlx::query_as::<_, AchievementModel>(
            r"
            SELECT id, name, description, icon, condition_type, condition_value
            FROM achievements
            ORDER BY condition_value, id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let total = results.len();
        let catalog: Vec<Achievement> = results.into_iter().filter_map(achievement_from_model).collect();
        if catalog.len() != total {
            warn!(skipped = total - catalog.len(), "achievements with unknown conditions ignored");
        }
        Ok(catalog)
    }

    #[instrument(skip(self))]
    async fn earned_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<UserAchievement>> {
        let results = sqlx::query_as::<_, UserAchievementModel>(
            r"
            SELECT user_id, achievement_id, earned_at
            FROM user_achievements
            WHERE user_id = $1
            ORDER BY earned_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(UserAchievement::from).collect())
    }

    #[instrument(skip(self))]
    async fn user_stats(&self, user_id: Snowflake) -> RepoResult<AchievementStats> {
        let stats = sqlx::query_as::<_, AchievementStatsModel>(
            r"
            SELECT
                (SELECT COUNT(*) FROM checkins WHERE user_id = $1) AS total_checkins,
                (SELECT COALESCE(MAX(best_streak), 0)::BIGINT
                   FROM challenge_members WHERE user_id = $1) AS best_streak,
                (SELECT COALESCE(SUM(points), 0)::BIGINT
                   FROM challenge_members WHERE user_id = $1) AS total_points,
                (SELECT COUNT(*) FROM challenge_members WHERE user_id = $1) AS challenges_joined,
                (SELECT COUNT(*) FROM challenges WHERE creator_id = $1) AS challenges_created,
                (SELECT COUNT(*) FROM checkins
                   WHERE user_id = $1 AND photo_url IS NOT NULL) AS photo_checkins
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(stats.into())
    }

    #[instrument(skip(self, award, notification), fields(user_id = %award.user_id, achievement_id = %award.achievement_id))]
    async fn award(&self, award: &UserAchievement, notification: &Notification) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query(
            r"
            INSERT INTO user_achievements (user_id, achievement_id, earned_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, achievement_id) DO NOTHING
            ",
        )
        .bind(award.user_id.into_inner())
        .bind(award.achievement_id.into_inner())
        .bind(award.earned_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(false);
        }

        insert_notification(&mut tx, notification).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }
}
