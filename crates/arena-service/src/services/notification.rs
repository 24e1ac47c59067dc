//! Notification service

use arena_core::{Notification, Snowflake};
use tracing::{debug, instrument};

use crate::dto::{CountResponse, NotificationResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The latest page, newest first. Viewing marks everything read; the
    /// returned items keep the flag they had before.
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Snowflake) -> ServiceResult<Vec<NotificationResponse>> {
        let repo = self.ctx.notification_repo();
        let notifications = repo.list_recent(user_id, Notification::PAGE_SIZE).await?;
        let marked = repo.mark_all_read(user_id).await?;
        debug!(marked, "Notifications marked read");

        let now = self.ctx.now();
        Ok(notifications
            .iter()
            .map(|n| NotificationResponse::new(n, now))
            .collect())
    }

    pub async fn unread_count(&self, user_id: Snowflake) -> ServiceResult<CountResponse> {
        Ok(CountResponse {
            count: self.ctx.notification_repo().unread_count(user_id).await?,
        })
    }
}
