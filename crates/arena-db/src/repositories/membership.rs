//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use arena_core::entities::Membership;
use arena_core::error::DomainError;
use arena_core::traits::{MembershipRepository, RepoResult};
use arena_core::value_objects::Snowflake;

use crate::models::MembershipModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) async fn insert_membership(
    tx: &mut Transaction<'_, Postgres>,
    membership: &Membership,
) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO challenge_members (id, challenge_id, user_id, points, current_streak,
                                       best_streak, streak_freezes, freezes_used, joined_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ",
    )
    .bind(membership.id.into_inner())
    .bind(membership.challenge_id.into_inner())
    .bind(membership.user_id.into_inner())
    .bind(membership.points)
    .bind(membership.current_streak)
    .bind(membership.best_streak)
    .bind(membership.streak_freezes)
    .bind(membership.freezes_used)
    .bind(membership.joined_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_unique_violation(e, || DomainError::AlreadyMember))?;

    Ok(())
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(&self, challenge_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT id, challenge_id, user_id, points, current_streak, best_streak,
                   streak_freezes, freezes_used, joined_at
            FROM challenge_members
            WHERE challenge_id = $1 AND user_id = $2
            ",
        )
        .bind(challenge_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Membership::from))
    }

    #[instrument(skip(self, membership), fields(challenge_id = %membership.challenge_id, user_id = %membership.user_id))]
    async fn create(&self, membership: &Membership) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        insert_membership(&mut tx, membership).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_challenge(&self, challenge_id: Snowflake) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT id, challenge_id, user_id, points, current_streak, best_streak,
                   streak_freezes, freezes_used, joined_at
            FROM challenge_members
            WHERE challenge_id = $1
            ORDER BY points DESC, current_streak DESC, joined_at ASC, user_id ASC
            ",
        )
        .bind(challenge_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Membership::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT id, challenge_id, user_id, points, current_streak, best_streak,
                   streak_freezes, freezes_used, joined_at
            FROM challenge_members
            WHERE user_id = $1
            ORDER BY joined_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Membership::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_challenge(&self, challenge_id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM challenge_members WHERE challenge_id = $1
            ",
        )
        .bind(challenge_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
