//! Social service: reactions, comments and nudges between members

use arena_core::{Comment, DomainError, Notification, Nudge, ReactionKind, Snowflake, User};
use tracing::{info, instrument};

use crate::dto::{
    CommentRequest, CommentResponse, MessageResponse, ReactionRequest, ReactionToggleResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Social service
pub struct SocialService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SocialService<'a> {
    /// Create a new SocialService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add or remove the caller's reaction on a check-in of this challenge
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn toggle_reaction(
        &self,
        user: &User,
        challenge_id: Snowflake,
        request: ReactionRequest,
    ) -> ServiceResult<ReactionToggleResponse> {
        let kind = ReactionKind::parse(&request.reaction)?;
        self.require_member(challenge_id, user.id).await?;

        let checkin = self
            .ctx
            .checkin_repo()
            .find_by_id(request.checkin_id)
            .await?
            .filter(|c| c.challenge_id == challenge_id)
            .ok_or(DomainError::CheckinNotFound(request.checkin_id))?;

        let toggle = self
            .ctx
            .reaction_repo()
            .toggle(checkin.id, user.id, kind)
            .await?;

        Ok(ReactionToggleResponse {
            count: toggle.count,
            toggled: toggle.added,
        })
    }

    /// Post to the challenge discussion
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn add_comment(
        &self,
        user: &User,
        challenge_id: Snowflake,
        request: CommentRequest,
    ) -> ServiceResult<CommentResponse> {
        self.require_member(challenge_id, user.id).await?;

        let comment = Comment::new(self.ctx.generate_id(), challenge_id, user.id, &request.message)?;
        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, challenge_id = %challenge_id, "Comment posted");

        Ok(CommentResponse::new(&comment, Some(user), self.ctx.now()))
    }

    /// Remind a member who has not checked in yet today
    #[instrument(skip(self, sender), fields(user_id = %sender.id))]
    pub async fn nudge(
        &self,
        sender: &User,
        challenge_id: Snowflake,
        target_id: Snowflake,
    ) -> ServiceResult<MessageResponse> {
        if sender.id == target_id {
            return Err(DomainError::SelfNudge.into());
        }

        let challenge = self
            .ctx
            .challenge_repo()
            .find_by_id(challenge_id)
            .await?
            .ok_or(DomainError::ChallengeNotFound(challenge_id))?;

        let memberships = self.ctx.membership_repo();
        if memberships.find(challenge_id, sender.id).await?.is_none()
            || memberships.find(challenge_id, target_id).await?.is_none()
        {
            return Err(DomainError::NudgeTargetNotMember.into());
        }

        // judged on the sender's calendar, the day they are looking at
        let today = sender.timezone.today(self.ctx.now());
        if self
            .ctx
            .checkin_repo()
            .find_on(challenge_id, target_id, today)
            .await?
            .is_some()
        {
            return Err(DomainError::NudgeTargetCheckedIn.into());
        }

        let nudge = Nudge::new(self.ctx.generate_id(), challenge_id, sender.id, target_id, today);
        let notification =
            Notification::nudged(self.ctx.generate_id(), target_id, &sender.display_name, &challenge);
        self.ctx
            .nudge_repo()
            .create_with_notification(&nudge, &notification)
            .await?;

        info!(challenge_id = %challenge_id, target_id = %target_id, "Nudge sent");

        if let Some(target) = self.ctx.user_repo().find_by_id(target_id).await? {
            if let Some(email) = target.email.as_deref() {
                info!(target_id = %target_id, email, "Nudge e-mail triggered");
            }
        }

        Ok(MessageResponse::ok("Nudge sent!"))
    }

    async fn require_member(&self, challenge_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .membership_repo()
            .find(challenge_id, user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::NotMember.into())
    }
}
