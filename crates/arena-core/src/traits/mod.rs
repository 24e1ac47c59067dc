//! Traits at the domain boundary: repositories and external ports

mod ports;
mod repositories;

pub use ports::{
    ExternalIdentity, IdentityProvider, ImageHost, PortResult, RateDecision, RateLimitPolicy,
    RateLimiter, SessionRecord, SessionStore,
};
pub use repositories::{
    AchievementRepository, ChallengeRepository, CheckinRepository, CommentRepository,
    MembershipRepository, NotificationRepository, NudgeRepository, ReactionRepository,
    RepoResult, UserRepository,
};
