//! # arena-core
//!
//! Domain layer for the challenge tracker: entities, value objects, the pure
//! scoring and standings rules, and the repository/port traits implemented
//! by the infrastructure crates. No I/O happens here.

pub mod entities;
pub mod error;
pub mod rules;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    find_template, safe_initial, Achievement, AchievementStats, Challenge, ChallengeTemplate,
    Checkin, CheckinReaction, Comment, ConditionType, Membership, Notification, NotificationKind,
    Nudge, ReactionKind, ReactionSummary, ReactionToggle, User, UserAchievement,
    VerificationType, CHALLENGE_TEMPLATES,
};
pub use error::DomainError;
pub use traits::{
    AchievementRepository, ChallengeRepository, CheckinRepository, CommentRepository,
    ExternalIdentity, IdentityProvider, ImageHost, MembershipRepository, NotificationRepository,
    NudgeRepository, PortResult, RateDecision, RateLimitPolicy, RateLimiter, ReactionRepository,
    RepoResult, SessionRecord, SessionStore, UserRepository,
};
pub use value_objects::{
    HostedImage, ImageFormat, ImageUpload, JoinCode, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, UploadTarget, UserTimezone,
};
