//! Administrative actions, limited to configured admin usernames

use arena_core::{DomainError, Snowflake};
use tracing::{instrument, warn};

use crate::dto::MessageResponse;

use super::auth::AuthenticatedUser;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    /// Create a new AdminService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Remove a check-in together with its reactions
    #[instrument(skip(self, caller), fields(user_id = %caller.user.id))]
    pub async fn delete_checkin(&self, caller: &AuthenticatedUser, checkin_id: Snowflake) -> ServiceResult<MessageResponse> {
        if !caller.is_admin {
            warn!(username = %caller.user.username, checkin_id = %checkin_id, "Non-admin attempted check-in deletion");
            return Err(DomainError::NotAdmin.into());
        }

        if !self.ctx.checkin_repo().delete_with_reactions(checkin_id).await? {
            return Err(DomainError::CheckinNotFound(checkin_id).into());
        }

        warn!(admin = %caller.user.username, checkin_id = %checkin_id, "Admin deleted check-in");
        Ok(MessageResponse::ok(format!("Check-in {checkin_id} deleted.")))
    }
}
