//! PostgreSQL implementation of CheckinRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{debug, instrument};

use arena_core::entities::{Checkin, Membership};
use arena_core::error::DomainError;
use arena_core::traits::{CheckinRepository, RepoResult};
use arena_core::value_objects::Snowflake;

use crate::models::{CheckinModel, DailyCountModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of CheckinRepository
#[derive(Clone)]
pub struct PgCheckinRepository {
    pool: PgPool,
}

impl PgCheckinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckinRepository for PgCheckinRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Checkin>> {
        let result = sqlx::query_as::<_, CheckinModel>(
            r"
            SELECT id, challenge_id, user_id, checkin_date, note, photo_url, created_at
            FROM checkins
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Checkin::from))
    }

    #[instrument(skip(self))]
    async fn find_on(
        &self,
        challenge_id: Snowflake,
        user_id: Snowflake,
        date: NaiveDate,
    ) -> RepoResult<Option<Checkin>> {
        let result = sqlx::query_as::<_, CheckinModel>(
            r"
            SELECT id, challenge_id, user_id, checkin_date, note, photo_url, created_at
            FROM checkins
            WHERE challenge_id = $1 AND user_id = $2 AND checkin_date = $3
            ",
        )
        .bind(challenge_id.into_inner())
        .bind(user_id.into_inner())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Checkin::from))
    }

    #[instrument(skip(self, checkin, before, after), fields(checkin_id = %checkin.id, user_id = %checkin.user_id))]
    async fn record(&self, checkin: &Checkin, before: &Membership, after: &Membership) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO checkins (id, challenge_id, user_id, checkin_date, note, photo_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(checkin.id.into_inner())
        .bind(checkin.challenge_id.into_inner())
        .bind(checkin.user_id.into_inner())
        .bind(checkin.checkin_date)
        .bind(&checkin.note)
        .bind(&checkin.photo_url)
        .bind(checkin.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyCheckedIn))?;

        // Guarded on the values the streak calculation was based on
        let updated = sqlx::query(
            r"
            UPDATE challenge_members
            SET points = $3, current_streak = $4, best_streak = $5,
                streak_freezes = $6, freezes_used = $7
            WHERE id = $1 AND user_id = $2
              AND points = $8 AND current_streak = $9 AND streak_freezes = $10
            ",
        )
        .bind(after.id.into_inner())
        .bind(after.user_id.into_inner())
        .bind(after.points)
        .bind(after.current_streak)
        .bind(after.best_streak)
        .bind(after.streak_freezes)
        .bind(after.freezes_used)
        .bind(before.points)
        .bind(before.current_streak)
        .bind(before.streak_freezes)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            debug!("membership changed underneath check-in, rolling back");
            tx.rollback().await.map_err(map_db_error)?;
            return Err(DomainError::StaleMembership);
        }

        sqlx::query(
            r"
            UPDATE users SET total_points = total_points + $2 WHERE id = $1
            ",
        )
        .bind(checkin.user_id.into_inner())
        .bind(after.points - before.points)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn recent_by_challenge(&self, challenge_id: Snowflake, limit: i64) -> RepoResult<Vec<Checkin>> {
        let results = sqlx::query_as::<_, CheckinModel>(
            r"
            SELECT id, challenge_id, user_id, checkin_date, note, photo_url, created_at
            FROM checkins
            WHERE challenge_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(challenge_id.into_inner())
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Checkin::from).collect())
    }

    #[instrument(skip(self))]
    async fn recent_by_user(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Checkin>> {
        let results = sqlx::query_as::<_, CheckinModel>(
            r"
            SELECT id, challenge_id, user_id, checkin_date, note, photo_url, created_at
            FROM checkins
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Checkin::from).collect())
    }

    #[instrument(skip(self))]
    async fn users_checked_in_on(&self, challenge_id: Snowflake, date: NaiveDate) -> RepoResult<Vec<Snowflake>> {
        let results = sqlx::query_scalar::<_, i64>(
            r"
            SELECT user_id FROM checkins WHERE challenge_id = $1 AND checkin_date = $2
            ",
        )
        .bind(challenge_id.into_inner())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn count_for_member(&self, challenge_id: Snowflake, user_id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM checkins WHERE challenge_id = $1 AND user_id = $2
            ",
        )
        .bind(challenge_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_by_user(&self, user_id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM checkins WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn daily_counts(&self, user_id: Snowflake, since: NaiveDate) -> RepoResult<Vec<(NaiveDate, i64)>> {
        let results = sqlx::query_as::<_, DailyCountModel>(
            r"
            SELECT checkin_date, COUNT(*) AS count
            FROM checkins
            WHERE user_id = $1 AND checkin_date >= $2
            GROUP BY checkin_date
            ORDER BY checkin_date
            ",
        )
        .bind(user_id.into_inner())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(|row| (row.checkin_date, row.count)).collect())
    }

    #[instrument(skip(self))]
    async fn delete_with_reactions(&self, id: Snowflake) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM checkin_reactions WHERE checkin_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let deleted = sqlx::query("DELETE FROM checkins WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(deleted.rows_affected() > 0)
    }
}
