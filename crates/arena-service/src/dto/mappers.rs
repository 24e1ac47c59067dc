//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.
//! Conversions that need the viewer or the clock are plain constructors.

use arena_core::rules::time_ago;
use arena_core::value_objects::optimized_url;
use arena_core::{
    Achievement, Challenge, Checkin, Comment, Membership, Notification, ReactionSummary, User,
    UserAchievement,
};
use chrono::{DateTime, Utc};

use super::responses::{
    AchievementEntry, ChallengeResponse, CheckinResponse, CommentResponse, CurrentUserResponse,
    LeaderboardEntry, MembershipResponse, NotificationResponse, ReactionSummaryResponse,
};

/// Avatar edge length in pixels
pub const AVATAR_SIZE: u32 = 80;

/// Check-in thumbnail width in pixels
pub const THUMBNAIL_WIDTH: u32 = 600;

fn avatar_url(user: &User) -> Option<String> {
    user.profile_photo
        .as_deref()
        .map(|url| optimized_url(url, Some(AVATAR_SIZE), Some(AVATAR_SIZE), "fill"))
}

// ============================================================================
// User Mappers
// ============================================================================

impl CurrentUserResponse {
    pub fn new(user: &User, is_admin: bool) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            profile_photo: user.profile_photo.clone(),
            avatar_url: avatar_url(user),
            initial: user.initial(),
            timezone: user.timezone.name().to_string(),
            total_points: user.total_points,
            is_admin,
            has_password: user.has_password(),
            google_linked: user.google_id.is_some(),
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Challenge Mappers
// ============================================================================

impl From<&Challenge> for ChallengeResponse {
    fn from(challenge: &Challenge) -> Self {
        Self {
            id: challenge.id,
            name: challenge.name.clone(),
            description: challenge.description.clone(),
            creator_id: challenge.creator_id,
            join_code: challenge.join_code.to_string(),
            is_public: challenge.is_public,
            points_per_checkin: challenge.points_per_checkin,
            penalty_per_miss: challenge.penalty_per_miss,
            streak_bonus: challenge.streak_bonus,
            verification_type: challenge.verification_type,
            end_date: challenge.end_date,
            milestone_target: challenge.milestone_target,
            is_completed: challenge.is_completed,
            winner_id: challenge.winner_id,
            created_at: challenge.created_at,
        }
    }
}

impl From<Challenge> for ChallengeResponse {
    fn from(challenge: Challenge) -> Self {
        Self::from(&challenge)
    }
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            points: membership.points,
            current_streak: membership.current_streak,
            best_streak: membership.best_streak,
            streak_freezes: membership.streak_freezes,
            freezes_used: membership.freezes_used,
            joined_at: membership.joined_at,
        }
    }
}

impl LeaderboardEntry {
    pub fn new(rank: usize, membership: &Membership, user: &User, checked_in_today: bool) -> Self {
        Self {
            rank,
            user_id: membership.user_id,
            display_name: user.display_name.clone(),
            username: user.username.clone(),
            profile_photo: user.profile_photo.clone(),
            avatar_url: avatar_url(user),
            initial: user.initial(),
            points: membership.points,
            current_streak: membership.current_streak,
            best_streak: membership.best_streak,
            checked_in_today,
        }
    }
}

// ============================================================================
// Activity Mappers
// ============================================================================

impl From<&ReactionSummary> for ReactionSummaryResponse {
    fn from(summary: &ReactionSummary) -> Self {
        Self {
            reaction: summary.kind.as_str(),
            count: summary.count,
            user_reacted: summary.user_reacted,
        }
    }
}

impl CheckinResponse {
    /// `author` is `None` when the user row has gone missing
    pub fn new(
        checkin: &Checkin,
        author: Option<&User>,
        reactions: Vec<ReactionSummaryResponse>,
        now: DateTime<Utc>,
    ) -> Self {
        let display_name = author.map_or_else(|| "Unknown".to_string(), |u| u.display_name.clone());
        Self {
            id: checkin.id,
            user_id: checkin.user_id,
            author_initial: arena_core::safe_initial(&display_name),
            display_name,
            checkin_date: checkin.checkin_date,
            note: checkin.note.clone(),
            photo_url: checkin.photo_url.clone(),
            thumbnail_url: checkin
                .photo_url
                .as_deref()
                .map(|url| optimized_url(url, Some(THUMBNAIL_WIDTH), None, "limit")),
            created_at: checkin.created_at,
            time_ago: time_ago(checkin.created_at, now),
            reactions,
        }
    }
}

impl CommentResponse {
    pub fn new(comment: &Comment, author: Option<&User>, now: DateTime<Utc>) -> Self {
        let display_name = author.map_or_else(|| "Unknown".to_string(), |u| u.display_name.clone());
        Self {
            id: comment.id,
            user_id: comment.user_id,
            author_initial: arena_core::safe_initial(&display_name),
            display_name,
            message: comment.message.clone(),
            created_at: comment.created_at,
            time_ago: time_ago(comment.created_at, now),
        }
    }
}

impl NotificationResponse {
    pub fn new(notification: &Notification, now: DateTime<Utc>) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            link: notification.link.clone(),
            is_read: notification.is_read,
            created_at: notification.created_at,
            time_ago: time_ago(notification.created_at, now),
        }
    }
}

// ============================================================================
// Achievement Mappers
// ============================================================================

impl AchievementEntry {
    pub fn new(achievement: &Achievement, earned: Option<&UserAchievement>) -> Self {
        Self {
            id: achievement.id,
            name: achievement.name.clone(),
            description: achievement.description.clone(),
            icon: achievement.icon.clone(),
            condition_type: achievement.condition,
            condition_value: achievement.threshold,
            earned: earned.is_some(),
            earned_at: earned.map(|e| e.earned_at),
        }
    }
}
