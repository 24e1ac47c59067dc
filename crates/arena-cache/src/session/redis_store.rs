//! Session storage in Redis.
//!
//! Refresh sessions expire with their tokens; each user's live sessions are
//! tracked in a set so they can all be revoked at once. OAuth `state` values
//! are single-use keys.

use async_trait::async_trait;
use redis::AsyncCommands;

use arena_core::traits::{PortResult, SessionRecord, SessionStore};
use arena_core::Snowflake;

use crate::pool::RedisPool;

const SESSION_PREFIX: &str = "session:";
const USER_SESSIONS_PREFIX: &str = "user_sessions:";
const OAUTH_STATE_PREFIX: &str = "oauth_state:";

/// Redis-backed [`SessionStore`]
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: RedisPool,
}

impl RedisSessionStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn session_key(session_id: &str) -> String {
        format!("{SESSION_PREFIX}{session_id}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_SESSIONS_PREFIX}{user_id}")
    }

    fn state_key(state: &str) -> String {
        format!("{OAUTH_STATE_PREFIX}{state}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn store_session(&self, record: &SessionRecord, ttl_secs: u64) -> PortResult<()> {
        self.pool
            .set(&Self::session_key(&record.session_id), record, ttl_secs)
            .await?;

        let user_key = Self::user_key(record.user_id);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&user_key, &record.session_id)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;
        conn.expire::<_, ()>(&user_key, ttl_secs as i64)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;

        tracing::debug!(
            user_id = %record.user_id,
            session_id = %record.session_id,
            "Stored session"
        );
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> PortResult<Option<SessionRecord>> {
        Ok(self.pool.get_value(&Self::session_key(session_id)).await?)
    }

    async fn revoke_session(&self, session_id: &str) -> PortResult<bool> {
        if let Some(record) = self.get_session(session_id).await? {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::user_key(record.user_id), session_id)
                .await
                .map_err(crate::pool::RedisPoolError::from)?;
        }

        let deleted = self.pool.delete(&Self::session_key(session_id)).await?;
        if deleted {
            tracing::debug!(session_id = %session_id, "Revoked session");
        }
        Ok(deleted)
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> PortResult<u32> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;

        let session_ids: Vec<String> = conn
            .smembers(&user_key)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;
        let keys: Vec<String> = session_ids.iter().map(|id| Self::session_key(id)).collect();
        let deleted = self.pool.delete_many(&keys).await?;

        conn.del::<_, ()>(&user_key)
            .await
            .map_err(crate::pool::RedisPoolError::from)?;

        tracing::info!(user_id = %user_id, count = deleted, "Revoked all sessions for user");
        Ok(deleted.max(0) as u32)
    }

    async fn store_oauth_state(&self, state: &str, ttl_secs: u64) -> PortResult<()> {
        self.pool.set(&Self::state_key(state), &true, ttl_secs).await?;
        Ok(())
    }

    async fn take_oauth_state(&self, state: &str) -> PortResult<bool> {
        Ok(self.pool.delete(&Self::state_key(state)).await?)
    }
}
