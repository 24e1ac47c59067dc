//! Domain entities - core business objects

mod achievement;
mod challenge;
mod checkin;
mod comment;
mod membership;
mod notification;
mod nudge;
mod reaction;
mod template;
mod user;

pub use achievement::{Achievement, AchievementStats, ConditionType, UserAchievement};
pub use challenge::{Challenge, VerificationType};
pub use checkin::Checkin;
pub use comment::Comment;
pub use membership::Membership;
pub use notification::{Notification, NotificationKind};
pub use nudge::Nudge;
pub use reaction::{CheckinReaction, ReactionKind, ReactionSummary, ReactionToggle};
pub use template::{find_template, ChallengeTemplate, CHALLENGE_TEMPLATES};
pub use user::{safe_initial, User};
