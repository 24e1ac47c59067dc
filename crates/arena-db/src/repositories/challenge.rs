//! PostgreSQL implementation of ChallengeRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use arena_core::entities::{Challenge, Membership, Notification};
use arena_core::error::DomainError;
use arena_core::traits::{ChallengeRepository, RepoResult};
use arena_core::value_objects::{JoinCode, Snowflake};

use crate::models::ChallengeModel;

use super::error::{map_db_error, map_unique_violation};
use super::membership::insert_membership;
use super::notification::insert_notification;

/// PostgreSQL implementation of ChallengeRepository
#[derive(Clone)]
pub struct PgChallengeRepository {
    pool: PgPool,
}

impl PgChallengeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_challenge(
    tx: &mut Transaction<'_, Postgres>,
    challenge: &Challenge,
) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO challenges (id, name, description, creator_id, join_code, is_public,
                                points_per_checkin, penalty_per_miss, streak_bonus,
                                verification_type, end_date, milestone_target, is_completed,
                                winner_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        ",
    )
    .bind(challenge.id.into_inner())
    .bind(&challenge.name)
    .bind(&challenge.description)
    .bind(challenge.creator_id.into_inner())
    .bind(challenge.join_code.as_str())
    .bind(challenge.is_public)
    .bind(challenge.points_per_checkin)
    .bind(challenge.penalty_per_miss)
    .bind(challenge.streak_bonus)
    .bind(challenge.verification_type.as_str())
    .bind(challenge.end_date)
    .bind(challenge.milestone_target)
    .bind(challenge.is_completed)
    .bind(challenge.winner_id.map(Snowflake::into_inner))
    .bind(challenge.created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_unique_violation(e, || DomainError::JoinCodeExists))?;

    Ok(())
}

#[async_trait]
impl ChallengeRepository for PgChallengeRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Challenge>> {
        let result = sqlx::query_as::<_, ChallengeModel>(
            r"
            SELECT id, name, description, creator_id, join_code, is_public, points_per_checkin,
                   penalty_per_miss, streak_bonus, verification_type, end_date, milestone_target,
                   is_completed, winner_id, created_at
            FROM challenges
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Challenge::from))
    }

    #[instrument(skip(self))]
    async fn find_by_join_code(&self, code: &JoinCode) -> RepoResult<Option<Challenge>> {
        let result = sqlx::query_as::<_, ChallengeModel>(
            r"
            SELECT id, name, description, creator_id, join_code, is_public, points_per_checkin,
                   penalty_per_miss, streak_bonus, verification_type, end_date, milestone_target,
                   is_completed, winner_id, created_at
            FROM challenges
            WHERE join_code = $1
            ",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Challenge::from))
    }

    #[instrument(skip(self, challenge, owner), fields(challenge_id = %challenge.id))]
    async fn create_with_owner(&self, challenge: &Challenge, owner: &Membership) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        insert_challenge(&mut tx, challenge).await?;
        insert_membership(&mut tx, owner).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_explorable(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Challenge>> {
        let results = sqlx::query_as::<_, ChallengeModel>(
            r"
            SELECT c.id, c.name, c.description, c.creator_id, c.join_code, c.is_public,
                   c.points_per_checkin, c.penalty_per_miss, c.streak_bonus, c.verification_type,
                   c.end_date, c.milestone_target, c.is_completed, c.winner_id, c.created_at
            FROM challenges c
            WHERE c.is_public AND NOT c.is_completed
              AND NOT EXISTS (
                  SELECT 1 FROM challenge_members m
                  WHERE m.challenge_id = c.id AND m.user_id = $1
              )
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Challenge::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_for_member(&self, user_id: Snowflake) -> RepoResult<Vec<Challenge>> {
        let results = sqlx::query_as::<_, ChallengeModel>(
            r"
            SELECT c.id, c.name, c.description, c.creator_id, c.join_code, c.is_public,
                   c.points_per_checkin, c.penalty_per_miss, c.streak_bonus, c.verification_type,
                   c.end_date, c.milestone_target, c.is_completed, c.winner_id, c.created_at
            FROM challenges c
            JOIN challenge_members m ON m.challenge_id = c.id
            WHERE m.user_id = $1
            ORDER BY m.joined_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Challenge::from).collect())
    }

    #[instrument(skip(self, notifications), fields(notified = notifications.len()))]
    async fn complete(
        &self,
        challenge_id: Snowflake,
        winner_id: Option<Snowflake>,
        notifications: &[Notification],
    ) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            UPDATE challenges
            SET is_completed = TRUE, winner_id = $2
            WHERE id = $1 AND is_completed = FALSE
            ",
        )
        .bind(challenge_id.into_inner())
        .bind(winner_id.map(Snowflake::into_inner))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Someone else completed it first
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(false);
        }

        for notification in notifications {
            insert_notification(&mut tx, notification).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgChallengeRepository>();
    }
}
