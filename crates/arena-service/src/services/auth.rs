//! Authentication service
//!
//! Handles registration, login, token refresh, logout, Google sign-in and
//! resolving a bearer token to the current user record.

use arena_common::auth::validate_password_strength;
use arena_common::AppError;
use arena_core::traits::{ExternalIdentity, SessionRecord};
use arena_core::{DomainError, User, UserTimezone};
use rand::Rng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, LogoutRequest, OAuthCallbackQuery,
    OAuthStartResponse, RefreshTokenRequest, RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// How long an OAuth `state` value stays redeemable
pub const OAUTH_STATE_TTL_SECS: u64 = 600;

const MAX_USERNAME_ATTEMPTS: usize = 20;

/// A request's caller: the stored user record plus the session the token belongs to
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub session_id: String,
    pub is_admin: bool,
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new password account
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        validate_password_strength(&request.password)?;

        let username = request.username.trim().to_lowercase();
        let email = request.email.trim().to_lowercase();

        if self.ctx.user_repo().username_exists(&username).await? {
            return Err(DomainError::UsernameAlreadyExists.into());
        }
        if self.ctx.user_repo().find_by_email(&email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let mut user = User::new(self.ctx.generate_id(), &username, Some(&email));
        user.password_hash = Some(self.ctx.password_service().hash(&request.password)?);
        if let Some(display_name) = request.display_name.as_deref().map(str::trim) {
            if !display_name.is_empty() {
                user.display_name = display_name.to_string();
            }
        }
        user.timezone = UserTimezone::parse_or_utc(request.timezone.as_deref());

        self.ctx.user_repo().create(&user).await?;

        info!(user_id = %user.id, "User registered");

        self.start_session(&user).await
    }

    /// Login with a username or e-mail address and a password
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let login_id = request.login_id.trim().to_lowercase();

        let found = if login_id.contains('@') {
            self.ctx.user_repo().find_by_email(&login_id).await?
        } else {
            self.ctx.user_repo().find_by_username(&login_id).await?
        };

        let Some(mut user) = found else {
            warn!("Login failed: unknown account");
            return Err(AppError::InvalidCredentials.into());
        };

        self.ctx
            .password_service()
            .verify_or_error(&request.password, user.password_hash.as_deref())
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: bad credentials"))?;

        // Browsers report UTC when they cannot tell, so only a real zone replaces the stored one
        if let Some(tz) = request.timezone.as_deref().and_then(UserTimezone::parse) {
            if !tz.is_utc() && tz != user.timezone {
                user.set_timezone(tz);
                self.ctx.user_repo().update(&user).await?;
            }
        }

        info!(user_id = %user.id, "User logged in");

        self.start_session(&user).await
    }

    /// Rotate a refresh token: the old session is revoked and a new one issued
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        let session = self
            .ctx
            .session_store()
            .get_session(&claims.sid)
            .await?
            .filter(|s| s.user_id == user_id)
            .ok_or(AppError::InvalidToken)?;

        self.ctx
            .session_store()
            .revoke_session(&session.session_id)
            .await?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        info!(user_id = %user.id, "Tokens refreshed");

        self.start_session(&user).await
    }

    /// Revoke the caller's session, and the one named by `refresh_token` if it is theirs
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user.id))]
    pub async fn logout(&self, caller: &AuthenticatedUser, request: LogoutRequest) -> ServiceResult<()> {
        let store = self.ctx.session_store();
        store.revoke_session(&caller.session_id).await?;

        if let Some(token) = request.refresh_token.as_deref() {
            match self.ctx.jwt_service().validate_refresh_token(token) {
                Ok(claims) if claims.user_id().ok() == Some(caller.user.id) => {
                    store.revoke_session(&claims.sid).await?;
                }
                _ => debug!("Ignoring refresh token that does not belong to the caller"),
            }
        }

        info!(user_id = %caller.user.id, "User logged out");
        Ok(())
    }

    /// Resolve an access token to the stored user.
    ///
    /// The token only names the user and session; profile fields always
    /// come from the user record.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<AuthenticatedUser> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;
        let user_id = claims.user_id()?;

        if self
            .ctx
            .session_store()
            .get_session(&claims.sid)
            .await?
            .is_none()
        {
            return Err(AppError::InvalidToken.into());
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(AuthenticatedUser {
            is_admin: self.ctx.is_admin(&user.username),
            user,
            session_id: claims.sid,
        })
    }

    pub fn current_user(&self, caller: &AuthenticatedUser) -> CurrentUserResponse {
        CurrentUserResponse::new(&caller.user, caller.is_admin)
    }

    // ========================================================================
    // Google sign-in
    // ========================================================================

    /// Remember a fresh `state` and return the consent page URL
    #[instrument(skip(self))]
    pub async fn google_start(&self) -> ServiceResult<OAuthStartResponse> {
        let provider = self.ctx.identity_provider()?;

        let state = Uuid::new_v4().simple().to_string();
        self.ctx
            .session_store()
            .store_oauth_state(&state, OAUTH_STATE_TTL_SECS)
            .await?;

        Ok(OAuthStartResponse {
            authorization_url: provider.authorization_url(&state),
            state,
        })
    }

    /// Finish the provider redirect: consume the state, exchange the code
    /// and sign in the matching, linked or newly created account.
    #[instrument(skip(self, query))]
    pub async fn google_callback(&self, query: OAuthCallbackQuery) -> ServiceResult<AuthResponse> {
        let provider = self.ctx.identity_provider()?;

        if let Some(error) = query.error.as_deref() {
            warn!(error = %error, "Identity provider returned an error");
            return Err(ServiceError::validation(
                "Google authentication failed. Please try again.",
            ));
        }

        let state = query.state.as_deref().unwrap_or_default();
        if state.is_empty() || !self.ctx.session_store().take_oauth_state(state).await? {
            warn!("OAuth callback with unknown or reused state");
            return Err(ServiceError::validation("Invalid or expired sign-in request."));
        }

        let code = query
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ServiceError::validation("Missing authorization code."))?;

        let identity = provider.exchange_code(code).await.inspect_err(|e| {
            warn!(error = %e, "Google code exchange failed");
        })?;

        let user = self.resolve_google_account(identity).await?;
        self.start_session(&user).await
    }

    /// Existing linked account, else link an unlinked account with the same
    /// e-mail (or username equal to the e-mail's local part), else create one.
    async fn resolve_google_account(&self, identity: ExternalIdentity) -> ServiceResult<User> {
        let users = self.ctx.user_repo();

        if let Some(user) = users.find_by_google_id(&identity.subject).await? {
            return Ok(user);
        }

        let email = identity
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());

        if let Some(email) = email.as_deref() {
            let local = email.split('@').next().unwrap_or_default();
            let candidate = match users.find_by_email(email).await? {
                Some(user) => Some(user),
                None => users.find_by_username(local).await?,
            };
            if let Some(mut user) = candidate.filter(|u| u.google_id.is_none()) {
                user.link_google(identity.subject, Some(email));
                users.update(&user).await?;
                info!(user_id = %user.id, "Linked Google account to existing user");
                return Ok(user);
            }
        }

        let username = self.unique_username(&base_username(email.as_deref())).await?;
        let email = match email {
            Some(e) if users.find_by_email(&e).await?.is_none() => Some(e),
            _ => None,
        };

        let mut user = User::new(self.ctx.generate_id(), &username, email.as_deref());
        user.google_id = Some(identity.subject);
        if let Some(name) = identity.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            user.display_name = name.to_string();
        }

        users.create(&user).await?;
        info!(user_id = %user.id, username = %user.username, "User created from Google sign-in");
        Ok(user)
    }

    /// `base` if free, otherwise `base_NNNN` with random digits
    async fn unique_username(&self, base: &str) -> ServiceResult<String> {
        let mut candidate = base.to_string();
        for _ in 0..MAX_USERNAME_ATTEMPTS {
            if !self.ctx.user_repo().username_exists(&candidate).await? {
                return Ok(candidate);
            }
            let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
            candidate = format!("{base}_{suffix:04}");
        }
        Err(ServiceError::internal("could not allocate a unique username"))
    }

    async fn start_session(&self, user: &User) -> ServiceResult<AuthResponse> {
        let jwt = self.ctx.jwt_service();
        let session_id = Uuid::new_v4().to_string();
        let tokens = jwt.issue(user.id, &session_id)?;

        let record = SessionRecord::new(user.id, session_id);
        self.ctx
            .session_store()
            .store_session(&record, jwt.refresh_token_expiry().max(0) as u64)
            .await?;

        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            user: CurrentUserResponse::new(user, self.ctx.is_admin(&user.username)),
        })
    }
}

/// Username seed from an e-mail's local part: lowercased, `[a-z0-9_]` only,
/// `user` when fewer than three characters remain.
pub fn base_username(email: Option<&str>) -> String {
    let local = email
        .and_then(|e| e.split('@').next())
        .unwrap_or_default()
        .to_lowercase();
    let filtered: String = local
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    if filtered.chars().count() < 3 {
        "user".to_string()
    } else {
        filtered
    }
}
