//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in arena-core.
//! Multi-row writes that must be atomic run inside a single transaction.

mod achievement;
mod challenge;
mod checkin;
mod comment;
mod error;
mod membership;
mod notification;
mod reaction;
mod user;

pub use achievement::PgAchievementRepository;
pub use challenge::PgChallengeRepository;
pub use checkin::PgCheckinRepository;
pub use comment::PgCommentRepository;
pub use membership::PgMembershipRepository;
pub use notification::{PgNotificationRepository, PgNudgeRepository};
pub use reaction::PgReactionRepository;
pub use user::PgUserRepository;
