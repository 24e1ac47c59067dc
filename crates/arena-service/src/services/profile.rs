//! Profile service
//!
//! The profile page (stats, activity calendar, weekly digest, earned
//! achievements), profile edits and the profile photo.

use std::collections::HashMap;

use arena_core::rules::{activity_calendar, digest_windows, weekly_digest, CALENDAR_DAYS};
use arena_core::{DomainError, ImageUpload, UploadTarget, User, UserTimezone};
use chrono::{Duration, NaiveDate};
use tracing::{info, instrument, warn};

use crate::dto::{
    CurrentUserResponse, ProfileResponse, ProfileStats, UpdateProfileRequest, UploadedFile,
};

use super::achievement::AchievementService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const MAX_DISPLAY_NAME_LEN: usize = 50;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn overview(&self, user: &User) -> ServiceResult<ProfileResponse> {
        let memberships = self.ctx.membership_repo().list_by_user(user.id).await?;
        let total_checkins = self.ctx.checkin_repo().count_by_user(user.id).await?;

        let stats = ProfileStats {
            total_challenges: memberships.len() as i64,
            total_points: memberships.iter().map(|m| m.points).sum(),
            best_streak: memberships
                .iter()
                .map(|m| i64::from(m.best_streak))
                .max()
                .unwrap_or(0),
            total_checkins,
        };

        let today = user.timezone.today(self.ctx.now());
        // the digest reaches back two weeks, the calendar thirty days
        let since = today - Duration::days(CALENDAR_DAYS);
        let counts: HashMap<_, _> = self
            .ctx
            .checkin_repo()
            .daily_counts(user.id, since)
            .await?
            .into_iter()
            .collect();

        let ((this_start, this_end), (last_start, last_end)) = digest_windows(today);
        let in_window = |start: NaiveDate, end: NaiveDate| -> i64 {
            counts
                .iter()
                .filter(|(date, _)| **date > start && **date <= end)
                .map(|(_, n)| *n)
                .sum()
        };
        let weekly_digest = weekly_digest(in_window(this_start, this_end), in_window(last_start, last_end));

        Ok(ProfileResponse {
            user: CurrentUserResponse::new(user, self.ctx.is_admin(&user.username)),
            stats,
            calendar_days: activity_calendar(today, &counts),
            weekly_digest,
            achievements: AchievementService::new(self.ctx).earned(user.id).await?,
        })
    }

    /// Change the display name and timezone
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn update(&self, user: &User, request: UpdateProfileRequest) -> ServiceResult<CurrentUserResponse> {
        let display_name = request.display_name.trim();
        if display_name.is_empty() {
            return Err(ServiceError::validation("Display name cannot be empty."));
        }
        if display_name.chars().count() > MAX_DISPLAY_NAME_LEN {
            return Err(ServiceError::validation(
                "Display name must be 50 characters or less.",
            ));
        }
        let timezone = UserTimezone::parse(&request.timezone)
            .ok_or_else(|| DomainError::InvalidTimezone(request.timezone.clone()))?;

        let mut updated = user.clone();
        updated.set_display_name(display_name.to_string());
        updated.set_timezone(timezone);
        self.ctx.user_repo().update(&updated).await?;

        info!(timezone = %timezone, "Profile updated");
        Ok(CurrentUserResponse::new(&updated, self.ctx.is_admin(&updated.username)))
    }

    /// Replace the profile photo
    #[instrument(skip(self, user, file), fields(user_id = %user.id))]
    pub async fn upload_photo(&self, user: &User, file: Option<UploadedFile>) -> ServiceResult<CurrentUserResponse> {
        let file = file
            .filter(|f| !f.filename.is_empty())
            .ok_or_else(|| ServiceError::validation("No file selected."))?;
        let image = ImageUpload::new(file.filename, file.bytes)?;
        let host = self.ctx.image_host()?;

        let hosted = host
            .upload(&image, &UploadTarget::profile_photo(user.id))
            .await
            .map_err(|e| {
                warn!(error = %e, "Profile photo upload failed");
                ServiceError::upstream("Failed to upload photo. Please try again.")
            })?;

        let mut updated = user.clone();
        updated.set_profile_photo(Some(hosted.url));
        self.ctx.user_repo().update(&updated).await?;

        info!(public_id = %hosted.public_id, "Profile photo updated");
        Ok(CurrentUserResponse::new(&updated, self.ctx.is_admin(&updated.username)))
    }

    /// Clear the stored photo; deleting it at the host is best effort
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn remove_photo(&self, user: &User) -> ServiceResult<CurrentUserResponse> {
        let mut updated = user.clone();
        updated.set_profile_photo(None);
        self.ctx.user_repo().update(&updated).await?;

        if user.profile_photo.is_some() {
            if let Some(host) = self.ctx.optional_image_host() {
                let public_id = UploadTarget::profile_photo(user.id).qualified_id();
                if let Err(e) = host.delete(&public_id).await {
                    warn!(public_id = %public_id, error = %e, "Failed to delete profile photo at host");
                }
            }
        }

        info!("Profile photo removed");
        Ok(CurrentUserResponse::new(&updated, self.ctx.is_admin(&updated.username)))
    }
}
