//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Challenge not found: {0}")]
    ChallengeNotFound(Snowflake),

    #[error("Check-in not found: {0}")]
    CheckinNotFound(Snowflake),

    #[error("Invalid join code.")]
    JoinCodeNotFound(String),

    #[error("Membership not found")]
    MembershipNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid file type. Please upload an image (png, jpg, jpeg, gif, webp).")]
    UnsupportedImageType,

    #[error("Uploaded file is not a valid image.")]
    InvalidImage,

    #[error("Image too large: max {max_bytes} bytes")]
    ImageTooLarge { max_bytes: usize },

    #[error("Invalid reaction")]
    InvalidReaction,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("You are not a member of this challenge.")]
    NotMember,

    #[error("Admin privileges required")]
    NotAdmin,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken.")]
    UsernameAlreadyExists,

    #[error("Email already registered.")]
    EmailAlreadyExists,

    #[error("Account already linked to another identity")]
    IdentityAlreadyLinked,

    #[error("You are already a member of this challenge.")]
    AlreadyMember,

    #[error("Already checked in today.")]
    AlreadyCheckedIn,

    #[error("Already nudged today")]
    AlreadyNudged,

    #[error("Join code already exists")]
    JoinCodeExists,

    #[error("Membership changed concurrently, please retry")]
    StaleMembership,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("This challenge has already ended.")]
    ChallengeCompleted,

    #[error("Photo proof is required for this challenge.")]
    PhotoRequired,

    #[error("Can't nudge yourself")]
    SelfNudge,

    #[error("Invalid member")]
    NudgeTargetNotMember,

    #[error("Already checked in")]
    NudgeTargetCheckedIn,

    #[error("End date must be in the future.")]
    EndDateNotInFuture,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChallengeNotFound(_) => "UNKNOWN_CHALLENGE",
            Self::CheckinNotFound(_) => "UNKNOWN_CHECKIN",
            Self::JoinCodeNotFound(_) => "UNKNOWN_JOIN_CODE",
            Self::MembershipNotFound => "UNKNOWN_MEMBERSHIP",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidTimezone(_) => "INVALID_TIMEZONE",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::UnsupportedImageType => "UNSUPPORTED_IMAGE_TYPE",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",
            Self::InvalidReaction => "INVALID_REACTION",

            // Authorization
            Self::NotMember => "NOT_A_MEMBER",
            Self::NotAdmin => "NOT_ADMIN",

            // Conflict
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::IdentityAlreadyLinked => "IDENTITY_ALREADY_LINKED",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::AlreadyCheckedIn => "ALREADY_CHECKED_IN",
            Self::AlreadyNudged => "ALREADY_NUDGED",
            Self::JoinCodeExists => "JOIN_CODE_EXISTS",
            Self::StaleMembership => "STALE_MEMBERSHIP",

            // Business Rules
            Self::ChallengeCompleted => "CHALLENGE_COMPLETED",
            Self::PhotoRequired => "PHOTO_REQUIRED",
            Self::SelfNudge => "SELF_NUDGE",
            Self::NudgeTargetNotMember => "INVALID_MEMBER",
            Self::NudgeTargetCheckedIn => "TARGET_ALREADY_CHECKED_IN",
            Self::EndDateNotInFuture => "END_DATE_NOT_IN_FUTURE",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::UpstreamError(_) => "UPSTREAM_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ChallengeNotFound(_)
                | Self::CheckinNotFound(_)
                | Self::JoinCodeNotFound(_)
                | Self::MembershipNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::InvalidTimezone(_)
                | Self::ContentTooLong { .. }
                | Self::UnsupportedImageType
                | Self::InvalidImage
                | Self::ImageTooLarge { .. }
                | Self::InvalidReaction
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotMember | Self::NotAdmin)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameAlreadyExists
                | Self::EmailAlreadyExists
                | Self::IdentityAlreadyLinked
                | Self::AlreadyMember
                | Self::AlreadyCheckedIn
                | Self::AlreadyNudged
                | Self::JoinCodeExists
                | Self::StaleMembership
        )
    }

    /// Check if the request was well-formed but a business rule refused it
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::ChallengeCompleted
                | Self::PhotoRequired
                | Self::SelfNudge
                | Self::NudgeTargetNotMember
                | Self::NudgeTargetCheckedIn
                | Self::EndDateNotInFuture
        )
    }

    /// Check if an external dependency (image host, identity provider) failed
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::ChallengeNotFound(Snowflake::new(1)).code(), "UNKNOWN_CHALLENGE");
        assert_eq!(DomainError::AlreadyCheckedIn.code(), "ALREADY_CHECKED_IN");
        assert_eq!(DomainError::NotMember.code(), "NOT_A_MEMBER");
    }

    #[test]
    fn test_categories_are_disjoint() {
        let samples = [
            DomainError::UserNotFound(Snowflake::new(1)),
            DomainError::InvalidImage,
            DomainError::NotAdmin,
            DomainError::AlreadyNudged,
            DomainError::PhotoRequired,
            DomainError::UpstreamError("down".into()),
        ];
        for err in &samples {
            let hits = [
                err.is_not_found(),
                err.is_validation(),
                err.is_authorization(),
                err.is_conflict(),
                err.is_rule_violation(),
                err.is_upstream(),
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            assert_eq!(hits, 1, "{err:?}");
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::ChallengeCompleted.to_string(),
            "This challenge has already ended."
        );
        assert_eq!(
            DomainError::ContentTooLong { max: 500 }.to_string(),
            "Content too long: max 500 characters"
        );
    }
}
