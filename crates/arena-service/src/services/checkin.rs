//! Check-in service
//!
//! Records a member's daily check-in. Preconditions are checked in a fixed
//! order, the photo (if any) is verified and uploaded before anything is
//! written, and the check-in, membership update and lifetime points are
//! committed by the repository in one transaction.

use arena_core::rules::{calculate, StreakInput};
use arena_core::value_objects::{
    has_allowed_extension, resolve_checkin_date, resolve_checkin_timezone, yesterday,
};
use arena_core::{Challenge, Checkin, DomainError, ImageUpload, Snowflake, UploadTarget, User, VerificationType};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::dto::{CheckinRequest, CheckinResultResponse, UploadedFile};

use super::achievement::AchievementService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Check-in service
pub struct CheckinService<'a> {
    ctx: &'a ServiceContext,
}

/// A photo that made it to the image host
struct StoredPhoto {
    url: String,
    public_id: String,
}

impl<'a> CheckinService<'a> {
    /// Create a new CheckinService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record today's check-in for `user` in `challenge_id`
    #[instrument(skip(self, user, request, photo), fields(user_id = %user.id, has_photo = photo.is_some()))]
    pub async fn record(
        &self,
        user: &User,
        challenge_id: Snowflake,
        request: CheckinRequest,
        photo: Option<UploadedFile>,
    ) -> ServiceResult<CheckinResultResponse> {
        let timezone = resolve_checkin_timezone(request.client_timezone.as_deref(), user.timezone);
        let today = timezone.today(self.ctx.now());
        let date = resolve_checkin_date(request.client_date.as_deref(), today);

        let note = request
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        if note.as_ref().is_some_and(|n| n.chars().count() > Checkin::MAX_NOTE_LEN) {
            return Err(DomainError::ContentTooLong {
                max: Checkin::MAX_NOTE_LEN,
            }
            .into());
        }

        let challenge = self
            .ctx
            .challenge_repo()
            .find_by_id(challenge_id)
            .await?
            .ok_or(DomainError::ChallengeNotFound(challenge_id))?;
        let membership = self
            .ctx
            .membership_repo()
            .find(challenge_id, user.id)
            .await?
            .ok_or(DomainError::NotMember)?;

        if challenge.is_completed {
            return Err(DomainError::ChallengeCompleted.into());
        }

        let checkins = self.ctx.checkin_repo();
        if checkins.find_on(challenge_id, user.id, date).await?.is_some() {
            return Err(DomainError::AlreadyCheckedIn.into());
        }

        let photo = match photo.filter(|p| !p.bytes.is_empty() && !p.filename.is_empty()) {
            Some(file) => self.store_photo(&challenge, user.id, date, file).await?,
            None => None,
        };

        if challenge.verification_type == VerificationType::PhotoRequired && photo.is_none() {
            return Err(DomainError::PhotoRequired.into());
        }

        let checked_in_yesterday = checkins
            .find_on(challenge_id, user.id, yesterday(date))
            .await?
            .is_some();
        let outcome = calculate(&StreakInput {
            current_streak: membership.current_streak,
            streak_freezes: membership.streak_freezes,
            checked_in_yesterday,
            points_per_checkin: challenge.points_per_checkin,
            streak_bonus: challenge.streak_bonus,
        });
        let updated = membership.applied(&outcome);

        let mut checkin = Checkin::new(self.ctx.generate_id(), challenge_id, user.id, date);
        checkin.note = note;
        checkin.photo_url = photo.as_ref().map(|p| p.url.clone());

        if let Err(e) = checkins.record(&checkin, &membership, &updated).await {
            if let Some(stored) = &photo {
                self.discard_photo(&stored.public_id).await;
            }
            return Err(e.into());
        }

        info!(
            checkin_id = %checkin.id,
            challenge_id = %challenge_id,
            date = %date,
            points = outcome.points_earned,
            streak = outcome.new_streak,
            freeze_used = outcome.freeze_used,
            "Check-in recorded"
        );

        let achievements_earned = AchievementService::new(self.ctx)
            .evaluate_after(user.id, "checkin")
            .await;

        Ok(CheckinResultResponse {
            success: true,
            message: result_message(outcome.points_earned, outcome.new_streak, outcome.freeze_used, outcome.freezes_earned),
            checkin_id: checkin.id,
            checkin_date: date,
            points_earned: outcome.points_earned,
            new_streak: outcome.new_streak,
            freeze_used: outcome.freeze_used,
            freeze_earned: outcome.freezes_earned,
            achievements_earned,
        })
    }

    /// Verify and upload. A file with a non-image extension is ignored; one
    /// that claims to be an image but is not is rejected. Upload failures
    /// only fail the request when the photo is mandatory.
    async fn store_photo(
        &self,
        challenge: &Challenge,
        user_id: Snowflake,
        date: NaiveDate,
        file: UploadedFile,
    ) -> ServiceResult<Option<StoredPhoto>> {
        if !has_allowed_extension(&file.filename) {
            debug!(filename = %file.filename, "Ignoring non-image attachment");
            return Ok(None);
        }
        let image = ImageUpload::new(file.filename, file.bytes)?;
        let required = challenge.verification_type == VerificationType::PhotoRequired;

        let Some(host) = self.ctx.optional_image_host() else {
            warn!(challenge_id = %challenge.id, "Photo submitted but image uploads are not configured");
            return Ok(None);
        };

        let target = UploadTarget::checkin_photo(challenge.id, user_id, date);
        match host.upload(&image, &target).await {
            Ok(hosted) => Ok(Some(StoredPhoto {
                url: hosted.url,
                public_id: hosted.public_id,
            })),
            Err(e) if required => {
                warn!(challenge_id = %challenge.id, error = %e, "Check-in photo upload failed");
                Err(ServiceError::upstream("Photo upload failed. Please try again."))
            }
            Err(e) => {
                warn!(challenge_id = %challenge.id, error = %e, "Check-in photo upload failed, continuing without photo");
                Ok(None)
            }
        }
    }

    async fn discard_photo(&self, public_id: &str) {
        if let Some(host) = self.ctx.optional_image_host() {
            if let Err(e) = host.delete(public_id).await {
                warn!(public_id, error = %e, "Failed to delete orphaned check-in photo");
            }
        }
    }
}

/// `Check-in recorded. +25 points (Streak: 4) Streak freeze used! +1 freeze earned!`
pub fn result_message(points: i64, streak: i32, freeze_used: bool, freezes_earned: i32) -> String {
    let mut message = format!("Check-in recorded. +{points} points (Streak: {streak})");
    if freeze_used {
        message.push_str(" Streak freeze used!");
    }
    if freezes_earned > 0 {
        let plural = if freezes_earned == 1 { "" } else { "s" };
        message.push_str(&format!(" +{freezes_earned} freeze{plural} earned!"));
    }
    message
}
