//! Challenge service
//!
//! Creating and joining challenges, the member view with its leaderboard,
//! and the public explore listing.

use std::collections::{HashMap, HashSet};

use arena_core::rules::{leaderboard_order, preview, MilestoneProgress, StreakInput};
use arena_core::value_objects::{parse_form_date, yesterday};
use arena_core::{
    find_template, Challenge, ChallengeTemplate, DomainError, JoinCode, Membership, Notification,
    Snowflake, User, VerificationType, CHALLENGE_TEMPLATES,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    ChallengeResponse, ChallengeViewResponse, CheckinResponse, CommentResponse,
    CreateChallengeRequest, ExploreEntry, JoinChallengeRequest, LeaderboardEntry,
    MembershipResponse, ReactionSummaryResponse,
};

use super::achievement::AchievementService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::lifecycle::LifecycleService;

const MAX_NAME_LEN: usize = 200;
const JOIN_CODE_ATTEMPTS: usize = 5;
const RECENT_CHECKINS: i64 = 20;
const RECENT_COMMENTS: i64 = 30;
const EXPLORE_LIMIT: i64 = 20;

/// Challenge service
pub struct ChallengeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChallengeService<'a> {
    /// Create a new ChallengeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn templates(&self) -> &'static [ChallengeTemplate] {
        CHALLENGE_TEMPLATES
    }

    /// Create a challenge with the caller as its first member
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn create(&self, user: &User, request: CreateChallengeRequest) -> ServiceResult<ChallengeResponse> {
        request.validate()?;

        let template = request.template.as_deref().and_then(find_template);

        let name = match request.name.trim() {
            "" => template.map(|t| t.name).unwrap_or_default(),
            name => name,
        };
        if name.is_empty() {
            return Err(ServiceError::validation("Challenge name is required."));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ServiceError::validation(
                "Challenge name is too long (200 character limit).",
            ));
        }

        let description = request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .or(template.map(|t| t.description));

        let verification_type = match request.verification_type.as_deref() {
            Some(raw) if !raw.trim().is_empty() => VerificationType::parse_lenient(raw),
            _ => template.map(|t| t.verification_type).unwrap_or_default(),
        };

        let end_date = parse_form_date(request.end_date.as_deref())?;
        if let Some(end) = end_date {
            if end <= user.timezone.today(self.ctx.now()) {
                return Err(DomainError::EndDateNotInFuture.into());
            }
        }

        let mut challenge = Challenge::new(
            self.ctx.generate_id(),
            name.to_string(),
            user.id,
            JoinCode::generate(),
        );
        challenge.description = description.map(str::to_string);
        challenge.is_public = request.is_public;
        challenge.points_per_checkin = small_int(
            request.points_per_checkin,
            template.map_or(Challenge::DEFAULT_POINTS, |t| t.points_per_checkin),
        )?;
        challenge.streak_bonus = small_int(
            request.streak_bonus,
            template.map_or(Challenge::DEFAULT_STREAK_BONUS, |t| t.streak_bonus),
        )?;
        challenge.penalty_per_miss = small_int(request.penalty_per_miss, Challenge::DEFAULT_PENALTY)?;
        challenge.verification_type = verification_type;
        challenge.end_date = end_date;
        challenge.milestone_target = request
            .milestone_target
            .map(|t| i32::try_from(t).map_err(|_| ServiceError::validation("Milestone target is too large.")))
            .transpose()?;

        let owner = Membership::new(self.ctx.generate_id(), challenge.id, user.id);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .ctx
                .challenge_repo()
                .create_with_owner(&challenge, &owner)
                .await
            {
                Ok(()) => break,
                Err(DomainError::JoinCodeExists) if attempt < JOIN_CODE_ATTEMPTS => {
                    warn!(attempt, "Join code collision, regenerating");
                    challenge.join_code = JoinCode::generate();
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(challenge_id = %challenge.id, join_code = %challenge.join_code, "Challenge created");

        AchievementService::new(self.ctx)
            .evaluate_after(user.id, "create_challenge")
            .await;

        Ok(ChallengeResponse::from(challenge))
    }

    /// Join by code
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn join(&self, user: &User, request: JoinChallengeRequest) -> ServiceResult<ChallengeResponse> {
        let code = JoinCode::normalize(&request.join_code)
            .ok_or_else(|| ServiceError::validation("Please enter a join code."))?;

        let challenge = self
            .ctx
            .challenge_repo()
            .find_by_join_code(&code)
            .await?
            .ok_or_else(|| DomainError::JoinCodeNotFound(code.to_string()))?;

        if challenge.is_completed {
            return Err(DomainError::ChallengeCompleted.into());
        }

        let membership = Membership::new(self.ctx.generate_id(), challenge.id, user.id);
        self.ctx.membership_repo().create(&membership).await?;

        info!(challenge_id = %challenge.id, "Joined challenge");

        if !challenge.is_owned_by(user.id) {
            let notification = Notification::member_joined(
                self.ctx.generate_id(),
                challenge.creator_id,
                &user.display_name,
                &challenge,
            );
            if let Err(e) = self.ctx.notification_repo().create(&notification).await {
                warn!(challenge_id = %challenge.id, error = %e, "Failed to notify challenge creator");
            }
        }

        AchievementService::new(self.ctx)
            .evaluate_after(user.id, "join_challenge")
            .await;

        Ok(ChallengeResponse::from(challenge))
    }

    /// Everything the challenge page shows. Members only.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn view(&self, user: &User, challenge_id: Snowflake) -> ServiceResult<ChallengeViewResponse> {
        LifecycleService::new(self.ctx).check_completed(user).await?;

        let challenge = self.find(challenge_id).await?;
        let membership = self
            .ctx
            .membership_repo()
            .find(challenge_id, user.id)
            .await?
            .ok_or(DomainError::NotMember)?;

        let now = self.ctx.now();
        let today = user.timezone.today(now);
        let checkins = self.ctx.checkin_repo();

        let leaderboard = self.leaderboard_for(&challenge, today).await?;

        let todays = checkins.find_on(challenge_id, user.id, today).await?;
        let checked_yesterday = checkins
            .find_on(challenge_id, user.id, yesterday(today))
            .await?
            .is_some();

        let recent = checkins.recent_by_challenge(challenge_id, RECENT_CHECKINS).await?;
        let comments = self
            .ctx
            .comment_repo()
            .recent_by_challenge(challenge_id, RECENT_COMMENTS)
            .await?;

        let author_ids: Vec<Snowflake> = recent
            .iter()
            .map(|c| c.user_id)
            .chain(comments.iter().map(|c| c.user_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let authors = self.users_by_id(&author_ids).await?;

        let checkin_ids: Vec<Snowflake> = recent.iter().map(|c| c.id).collect();
        let mut reactions: HashMap<Snowflake, Vec<ReactionSummaryResponse>> = HashMap::new();
        for summary in self
            .ctx
            .reaction_repo()
            .summaries(&checkin_ids, user.id)
            .await?
        {
            reactions
                .entry(summary.checkin_id)
                .or_default()
                .push(ReactionSummaryResponse::from(&summary));
        }

        let recent_checkins = recent
            .iter()
            .map(|c| {
                CheckinResponse::new(
                    c,
                    authors.get(&c.user_id),
                    reactions.remove(&c.id).unwrap_or_default(),
                    now,
                )
            })
            .collect();
        let comments = comments
            .iter()
            .map(|c| CommentResponse::new(c, authors.get(&c.user_id), now))
            .collect();

        let own_checkins = checkins.count_for_member(challenge_id, user.id).await?;
        let checkin_preview = preview(&StreakInput {
            current_streak: membership.current_streak,
            streak_freezes: membership.streak_freezes,
            checked_in_yesterday: checked_yesterday,
            points_per_checkin: challenge.points_per_checkin,
            streak_bonus: challenge.streak_bonus,
        });

        Ok(ChallengeViewResponse {
            member_count: leaderboard.len(),
            leaderboard,
            membership: MembershipResponse::from(&membership),
            checked_in_today: todays.is_some(),
            checkin_time: todays.map(|c| c.created_at),
            recent_checkins,
            comments,
            days_remaining: challenge.days_remaining(today),
            milestone_progress: MilestoneProgress::new(own_checkins, challenge.milestone_target),
            checkin_preview,
            today,
            challenge: ChallengeResponse::from(challenge),
        })
    }

    /// Standings. Public challenges are visible to anyone signed in.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn leaderboard(&self, user: &User, challenge_id: Snowflake) -> ServiceResult<Vec<LeaderboardEntry>> {
        let challenge = self.find(challenge_id).await?;
        if !challenge.is_public
            && self
                .ctx
                .membership_repo()
                .find(challenge_id, user.id)
                .await?
                .is_none()
        {
            return Err(DomainError::NotMember.into());
        }

        let today = user.timezone.today(self.ctx.now());
        self.leaderboard_for(&challenge, today).await
    }

    /// Public open challenges the caller has not joined, newest first
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn explore(&self, user: &User) -> ServiceResult<Vec<ExploreEntry>> {
        let challenges = self
            .ctx
            .challenge_repo()
            .list_explorable(user.id, EXPLORE_LIMIT)
            .await?;

        let creator_ids: Vec<Snowflake> = challenges.iter().map(|c| c.creator_id).collect();
        let creators = self.users_by_id(&creator_ids).await?;

        let mut entries = Vec::with_capacity(challenges.len());
        for challenge in challenges {
            let member_count = self
                .ctx
                .membership_repo()
                .count_by_challenge(challenge.id)
                .await?;
            entries.push(ExploreEntry {
                creator_name: display_name_of(creators.get(&challenge.creator_id)),
                member_count,
                challenge: ChallengeResponse::from(challenge),
            });
        }
        Ok(entries)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn find(&self, challenge_id: Snowflake) -> ServiceResult<Challenge> {
        Ok(self
            .ctx
            .challenge_repo()
            .find_by_id(challenge_id)
            .await?
            .ok_or(DomainError::ChallengeNotFound(challenge_id))?)
    }

    async fn leaderboard_for(&self, challenge: &Challenge, today: chrono::NaiveDate) -> ServiceResult<Vec<LeaderboardEntry>> {
        let mut members = self
            .ctx
            .membership_repo()
            .list_by_challenge(challenge.id)
            .await?;
        members.sort_by(leaderboard_order);

        let ids: Vec<Snowflake> = members.iter().map(|m| m.user_id).collect();
        let users = self.users_by_id(&ids).await?;
        let checked: HashSet<Snowflake> = self
            .ctx
            .checkin_repo()
            .users_checked_in_on(challenge.id, today)
            .await?
            .into_iter()
            .collect();

        Ok(members
            .iter()
            .filter_map(|m| users.get(&m.user_id).map(|u| (m, u)))
            .enumerate()
            .map(|(i, (m, u))| LeaderboardEntry::new(i + 1, m, u, checked.contains(&m.user_id)))
            .collect())
    }

    async fn users_by_id(&self, ids: &[Snowflake]) -> ServiceResult<HashMap<Snowflake, User>> {
        Ok(self
            .ctx
            .user_repo()
            .find_many(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }
}

/// Display name, or "Unknown" for a missing user row
pub(crate) fn display_name_of(user: Option<&User>) -> String {
    user.map_or_else(|| "Unknown".to_string(), |u| u.display_name.clone())
}

/// A validated form number narrowed to the column type, or `default` when absent
fn small_int(value: Option<i64>, default: i32) -> ServiceResult<i32> {
    value.map_or(Ok(default), |v| {
        i32::try_from(v).map_err(|_| ServiceError::validation(format!("{v} is out of range.")))
    })
}
