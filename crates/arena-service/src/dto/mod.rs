//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CheckinRequest, CommentRequest, CreateChallengeRequest, JoinChallengeRequest, LoginRequest,
    LogoutRequest, OAuthCallbackQuery, ReactionRequest, RefreshTokenRequest, RegisterRequest,
    UpdateProfileRequest, UploadedFile,
};

pub use responses::{
    AchievementEntry, AchievementsResponse, AuthResponse, ChallengeResponse,
    ChallengeViewResponse, CheckinResponse, CheckinResultResponse, CommentResponse,
    CompletedChallenge, CountResponse, CurrentUserResponse, DashboardChallenge, DashboardResponse,
    DashboardStats, ExploreEntry, HealthChecks, HealthResponse, LeaderboardEntry,
    MembershipResponse, MessageResponse, NotificationResponse, OAuthStartResponse, ProfileResponse,
    ProfileStats, ReactionSummaryResponse, ReactionToggleResponse, ReadinessResponse,
    RecentActivity,
};

pub use mappers::{AVATAR_SIZE, THUMBNAIL_WIDTH};
