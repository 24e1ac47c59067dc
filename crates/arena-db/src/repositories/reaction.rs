//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use arena_core::entities::{ReactionKind, ReactionSummary, ReactionToggle};
use arena_core::traits::{ReactionRepository, RepoResult};
use arena_core::value_objects::Snowflake;

use crate::mappers::reaction_summary_from_model;
use crate::models::ReactionCountModel;

use super::error::{map_db_error, raw_ids};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn toggle(&self, checkin_id: Snowflake, user_id: Snowflake, kind: ReactionKind) -> RepoResult<ReactionToggle> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query(
            r"
            DELETE FROM checkin_reactions
            WHERE checkin_id = $1 AND user_id = $2 AND reaction = $3
            ",
        )
        .bind(checkin_id.into_inner())
        .bind(user_id.into_inner())
        .bind(kind.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let added = removed.rows_affected() == 0;
        if added {
            sqlx::query(
                r"
                INSERT INTO checkin_reactions (checkin_id, user_id, reaction)
                VALUES ($1, $2, $3)
                ON CONFLICT (checkin_id, user_id, reaction) DO NOTHING
                ",
            )
            .bind(checkin_id.into_inner())
            .bind(user_id.into_inner())
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM checkin_reactions WHERE checkin_id = $1 AND reaction = $2
            ",
        )
        .bind(checkin_id.into_inner())
        .bind(kind.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(ReactionToggle { added, count })
    }

    #[instrument(skip(self, checkin_ids), fields(count = checkin_ids.len()))]
    async fn summaries(&self, checkin_ids: &[Snowflake], viewer: Snowflake) -> RepoResult<Vec<ReactionSummary>> {
        if checkin_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, ReactionCountModel>(
            r"
            SELECT checkin_id, reaction, COUNT(*) AS count, BOOL_OR(user_id = $2) AS user_reacted
            FROM checkin_reactions
            WHERE checkin_id = ANY($1)
            GROUP BY checkin_id, reaction
            ORDER BY checkin_id, reaction
            ",
        )
        .bind(raw_ids(checkin_ids))
        .bind(viewer.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().filter_map(reaction_summary_from_model).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReactionRepository>();
    }
}
