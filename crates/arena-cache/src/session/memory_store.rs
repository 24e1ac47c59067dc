//! In-process session storage for tests and single-node development.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use arena_core::traits::{PortResult, SessionRecord, SessionStore};
use arena_core::Snowflake;

struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Expiring<T> {
    fn new(value: T, ttl_secs: u64) -> Self {
        Self {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// [`SessionStore`] kept in memory. Expired entries are dropped on access.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Expiring<SessionRecord>>,
    states: DashMap<String, Expiring<()>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn store_session(&self, record: &SessionRecord, ttl_secs: u64) -> PortResult<()> {
        self.sessions
            .insert(record.session_id.clone(), Expiring::new(record.clone(), ttl_secs));
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> PortResult<Option<SessionRecord>> {
        let live = self
            .sessions
            .get(session_id)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.clone());
        if live.is_none() {
            self.sessions.remove(session_id);
        }
        Ok(live)
    }

    async fn revoke_session(&self, session_id: &str) -> PortResult<bool> {
        Ok(self
            .sessions
            .remove(session_id)
            .is_some_and(|(_, entry)| entry.is_live()))
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> PortResult<u32> {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.value.user_id != user_id);
        Ok((before - self.sessions.len()) as u32)
    }

    async fn store_oauth_state(&self, state: &str, ttl_secs: u64) -> PortResult<()> {
        self.states.insert(state.to_string(), Expiring::new((), ttl_secs));
        Ok(())
    }

    async fn take_oauth_state(&self, state: &str) -> PortResult<bool> {
        Ok(self
            .states
            .remove(state)
            .is_some_and(|(_, entry)| entry.is_live()))
    }
}
