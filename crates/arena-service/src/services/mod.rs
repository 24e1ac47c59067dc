//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and orchestrates the
//! repositories, ports and pure domain rules for one area of the app.

pub mod achievement;
pub mod admin;
pub mod auth;
pub mod challenge;
pub mod checkin;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod lifecycle;
pub mod notification;
pub mod profile;
pub mod social;

// Re-export all services for convenience
pub use achievement::AchievementService;
pub use admin::AdminService;
pub use auth::{AuthService, AuthenticatedUser};
pub use challenge::ChallengeService;
pub use checkin::CheckinService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dashboard::DashboardService;
pub use error::{ServiceError, ServiceResult};
pub use lifecycle::LifecycleService;
pub use notification::NotificationService;
pub use profile::ProfileService;
pub use social::SocialService;
