//! PostgreSQL implementations of NotificationRepository and NudgeRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use arena_core::entities::{Notification, Nudge};
use arena_core::error::DomainError;
use arena_core::traits::{NotificationRepository, NudgeRepository, RepoResult};
use arena_core::value_objects::Snowflake;

use crate::models::NotificationModel;

use super::error::{map_db_error, map_unique_violation};

pub(super) async fn insert_notification(
    tx: &mut Transaction<'_, Postgres>,
    notification: &Notification,
) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO notifications (id, user_id, kind, title, message, link, is_read, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ",
    )
    .bind(notification.id.into_inner())
    .bind(notification.user_id.into_inner())
    .bind(notification.kind.as_str())
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(&notification.link)
    .bind(notification.is_read)
    .bind(notification.created_at)
    .execute(&mut **tx)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id, kind = notification.kind.as_str()))]
    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        insert_notification(&mut tx, notification).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Notification>> {
        let results = sqlx::query_as::<_, NotificationModel>(
            r"
            SELECT id, user_id, kind, title, message, link, is_read, created_at
            FROM notifications
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

        Ok(results.into_iter().map(Notification::from).collect())
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, user_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE
            ",
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}

/// PostgreSQL implementation of NudgeRepository
#[derive(Clone)]
pub struct PgNudgeRepository {
    pool: PgPool,
}

impl PgNudgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NudgeRepository for PgNudgeRepository {
    #[instrument(skip(self, nudge, notification), fields(challenge_id = %nudge.challenge_id, receiver_id = %nudge.receiver_id))]
    async fn create_with_notification(&self, nudge: &Nudge, notification: &Notification) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO nudges (id, challenge_id, from_user_id, to_user_id, nudge_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(nudge.id.into_inner())
        .bind(nudge.challenge_id.into_inner())
        .bind(nudge.sender_id.into_inner())
        .bind(nudge.receiver_id.into_inner())
        .bind(nudge.nudge_date)
        .bind(nudge.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyNudged))?;

        insert_notification(&mut tx, notification).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}
