//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Operations that must be atomic are single
//! trait methods so an implementation can wrap them in one transaction.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{
    Achievement, AchievementStats, Challenge, Checkin, Comment, Membership, Notification, Nudge,
    ReactionKind, ReactionSummary, ReactionToggle, User, UserAchievement,
};
use crate::error::DomainError;
use crate::value_objects::{JoinCode, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Users for the given ids, in no particular order. Unknown ids are skipped.
    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Case-insensitive lookup
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn find_by_google_id(&self, google_id: &str) -> RepoResult<Option<User>>;

    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Insert a user. Duplicate username/email map to the matching conflict error.
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Persist display name, timezone, photo, email and linked identity
    async fn update(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Challenge Repository
// ============================================================================

#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Challenge>>;

    async fn find_by_join_code(&self, code: &JoinCode) -> RepoResult<Option<Challenge>>;

    /// Insert the challenge and its creator's membership atomically.
    /// A join code collision yields [`DomainError::JoinCodeExists`].
    async fn create_with_owner(&self, challenge: &Challenge, owner: &Membership) -> RepoResult<()>;

    /// Public, unfinished challenges the user has not joined, newest first
    async fn list_explorable(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Challenge>>;

    /// Challenges the user is a member of
    async fn list_for_member(&self, user_id: Snowflake) -> RepoResult<Vec<Challenge>>;

    /// Mark completed, set the winner and insert the notifications in one
    /// transaction. Returns `false` without writing anything when the
    /// challenge was already completed.
    async fn complete(
        &self,
        challenge_id: Snowflake,
        winner_id: Option<Snowflake>,
        notifications: &[Notification],
    ) -> RepoResult<bool>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find(&self, challenge_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Membership>>;

    /// Insert a membership. Duplicate pairs yield [`DomainError::AlreadyMember`].
    async fn create(&self, membership: &Membership) -> RepoResult<()>;

    async fn list_by_challenge(&self, challenge_id: Snowflake) -> RepoResult<Vec<Membership>>;

    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Membership>>;

    async fn count_by_challenge(&self, challenge_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Check-in Repository
// ============================================================================

#[async_trait]
pub trait CheckinRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Checkin>>;

    async fn find_on(
        &self,
        challenge_id: Snowflake,
        user_id: Snowflake,
        date: NaiveDate,
    ) -> RepoResult<Option<Checkin>>;

    /// Insert the check-in, move the membership from `before` to `after` and
    /// add the point difference to the user's lifetime total, all in one
    /// transaction.
    ///
    /// A second check-in for the same day yields [`DomainError::AlreadyCheckedIn`].
    /// If the membership no longer matches `before` the transaction is rolled
    /// back with [`DomainError::StaleMembership`].
    async fn record(&self, checkin: &Checkin, before: &Membership, after: &Membership) -> RepoResult<()>;

    /// Newest first
    async fn recent_by_challenge(&self, challenge_id: Snowflake, limit: i64) -> RepoResult<Vec<Checkin>>;

    /// Newest first, across all challenges
    async fn recent_by_user(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Checkin>>;

    /// Members of the challenge with a check-in on `date`
    async fn users_checked_in_on(&self, challenge_id: Snowflake, date: NaiveDate) -> RepoResult<Vec<Snowflake>>;

    async fn count_for_member(&self, challenge_id: Snowflake, user_id: Snowflake) -> RepoResult<i64>;

    async fn count_by_user(&self, user_id: Snowflake) -> RepoResult<i64>;

    /// Check-ins per date for dates on or after `since`
    async fn daily_counts(&self, user_id: Snowflake, since: NaiveDate) -> RepoResult<Vec<(NaiveDate, i64)>>;

    /// Remove a check-in and its reactions together. Returns `false` if it did not exist.
    async fn delete_with_reactions(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Add the reaction if absent, remove it if present. Returns the new state
    /// and the count of that reaction kind on the check-in.
    async fn toggle(&self, checkin_id: Snowflake, user_id: Snowflake, kind: ReactionKind) -> RepoResult<ReactionToggle>;

    /// Per-kind counts for the given check-ins, flagged where `viewer` reacted
    async fn summaries(&self, checkin_ids: &[Snowflake], viewer: Snowflake) -> RepoResult<Vec<ReactionSummary>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Newest first
    async fn recent_by_challenge(&self, challenge_id: Snowflake, limit: i64) -> RepoResult<Vec<Comment>>;
}

// ============================================================================
// Nudge Repository
// ============================================================================

#[async_trait]
pub trait NudgeRepository: Send + Sync {
    /// Insert the nudge and the receiver's notification together.
    /// A repeat on the same day yields [`DomainError::AlreadyNudged`].
    async fn create_with_notification(&self, nudge: &Nudge, notification: &Notification) -> RepoResult<()>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> RepoResult<()>;

    /// Newest first
    async fn list_recent(&self, user_id: Snowflake, limit: i64) -> RepoResult<Vec<Notification>>;

    async fn mark_all_read(&self, user_id: Snowflake) -> RepoResult<u64>;

    async fn unread_count(&self, user_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Achievement Repository
// ============================================================================

#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Whole catalog ordered by threshold
    async fn list_all(&self) -> RepoResult<Vec<Achievement>>;

    async fn earned_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<UserAchievement>>;

    async fn user_stats(&self, user_id: Snowflake) -> RepoResult<AchievementStats>;

    /// Record the award and its notification. Returns `false`, writing
    /// nothing, when the user already holds the achievement.
    async fn award(&self, award: &UserAchievement, notification: &Notification) -> RepoResult<bool>;
}
