//! Database models - SQLx-compatible structs for PostgreSQL tables

mod achievement;
mod challenge;
mod checkin;
mod comment;
mod membership;
mod notification;
mod reaction;
mod user;

pub use achievement::{AchievementModel, AchievementStatsModel, UserAchievementModel};
pub use challenge::ChallengeModel;
pub use checkin::{CheckinModel, DailyCountModel};
pub use comment::CommentModel;
pub use membership::MembershipModel;
pub use notification::NotificationModel;
pub use reaction::ReactionCountModel;
pub use user::UserModel;
