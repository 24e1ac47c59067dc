//! # arena-service
//!
//! Application layer: the services behind every route, their request and
//! response DTOs, and the HTTP clients for the external image host and
//! identity provider.

pub mod clients;
pub mod dto;
pub mod services;

#[cfg(test)]
mod testing;

pub use clients::{CloudinaryImageHost, GoogleIdentityProvider};
pub use services::{
    AchievementService, AdminService, AuthService, AuthenticatedUser, ChallengeService,
    CheckinService, DashboardService, LifecycleService, NotificationService, ProfileService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, SocialService,
};
