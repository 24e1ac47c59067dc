//! Service context - dependency container for services
//!
//! Holds the repositories, the session store, the optional outbound clients
//! and the token/id machinery every service needs.

use std::sync::Arc;

use arena_common::auth::{JwtService, PasswordService};
use arena_common::AdminConfig;
use arena_core::traits::{
    AchievementRepository, ChallengeRepository, CheckinRepository, CommentRepository,
    IdentityProvider, ImageHost, MembershipRepository, NotificationRepository, NudgeRepository,
    ReactionRepository, SessionStore, UserRepository,
};
use arena_core::{Snowflake, SnowflakeGenerator};
use chrono::{DateTime, Utc};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloned into every request; all members are shared handles.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    challenge_repo: Arc<dyn ChallengeRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    checkin_repo: Arc<dyn CheckinRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    nudge_repo: Arc<dyn NudgeRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    achievement_repo: Arc<dyn AchievementRepository>,

    // Ports
    session_store: Arc<dyn SessionStore>,
    image_host: Option<Arc<dyn ImageHost>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    snowflake_generator: Arc<SnowflakeGenerator>,
    admin: Arc<AdminConfig>,
}

impl ServiceContext {
    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn challenge_repo(&self) -> &dyn ChallengeRepository {
        self.challenge_repo.as_ref()
    }

    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    pub fn checkin_repo(&self) -> &dyn CheckinRepository {
        self.checkin_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn nudge_repo(&self) -> &dyn NudgeRepository {
        self.nudge_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn achievement_repo(&self) -> &dyn AchievementRepository {
        self.achievement_repo.as_ref()
    }

    // === Ports ===

    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    /// The image host, or a "not configured" error when uploads are disabled
    pub fn image_host(&self) -> ServiceResult<&dyn ImageHost> {
        self.image_host
            .as_deref()
            .ok_or(ServiceError::App(arena_common::AppError::NotConfigured("Image upload")))
    }

    /// The image host when uploads are enabled
    pub fn optional_image_host(&self) -> Option<&dyn ImageHost> {
        self.image_host.as_deref()
    }

    /// The identity provider, or a "not configured" error when OAuth is disabled
    pub fn identity_provider(&self) -> ServiceResult<&dyn IdentityProvider> {
        self.identity_provider
            .as_deref()
            .ok_or(ServiceError::App(arena_common::AppError::NotConfigured("Google sign-in")))
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.admin.is_admin(username)
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("image_host", &self.image_host.is_some())
            .field("identity_provider", &self.identity_provider.is_some())
            .field("admin", &self.admin)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    challenge_repo: Option<Arc<dyn ChallengeRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    checkin_repo: Option<Arc<dyn CheckinRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    nudge_repo: Option<Arc<dyn NudgeRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    achievement_repo: Option<Arc<dyn AchievementRepository>>,
    session_store: Option<Arc<dyn SessionStore>>,
    image_host: Option<Arc<dyn ImageHost>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    admin: AdminConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn challenge_repo(mut self, repo: Arc<dyn ChallengeRepository>) -> Self {
        self.challenge_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn checkin_repo(mut self, repo: Arc<dyn CheckinRepository>) -> Self {
        self.checkin_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn nudge_repo(mut self, repo: Arc<dyn NudgeRepository>) -> Self {
        self.nudge_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn achievement_repo(mut self, repo: Arc<dyn AchievementRepository>) -> Self {
        self.achievement_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn image_host(mut self, host: Option<Arc<dyn ImageHost>>) -> Self {
        self.image_host = host;
        self
    }

    pub fn identity_provider(mut self, provider: Option<Arc<dyn IdentityProvider>>) -> Self {
        self.identity_provider = provider;
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn admin(mut self, admin: AdminConfig) -> Self {
        self.admin = admin;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            challenge_repo: required(self.challenge_repo, "challenge_repo")?,
            membership_repo: required(self.membership_repo, "membership_repo")?,
            checkin_repo: required(self.checkin_repo, "checkin_repo")?,
            reaction_repo: required(self.reaction_repo, "reaction_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            nudge_repo: required(self.nudge_repo, "nudge_repo")?,
            notification_repo: required(self.notification_repo, "notification_repo")?,
            achievement_repo: required(self.achievement_repo, "achievement_repo")?,
            session_store: required(self.session_store, "session_store")?,
            image_host: self.image_host,
            identity_provider: self.identity_provider,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: PasswordService::new(),
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            admin: Arc::new(self.admin),
        })
    }
}
