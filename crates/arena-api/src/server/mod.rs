//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use arena_cache::{rate_limiter_for, RedisPool, RedisSessionStore};
use arena_common::{AppConfig, AppError, JwtService};
use arena_core::{IdentityProvider, ImageHost, SnowflakeGenerator};
use arena_db::{
    create_pool, run_migrations, DatabaseConfig, PgAchievementRepository, PgChallengeRepository,
    PgCheckinRepository, PgCommentRepository, PgMembershipRepository, PgNotificationRepository,
    PgNudgeRepository, PgReactionRepository, PgUserRepository,
};
use arena_service::{CloudinaryImageHost, GoogleIdentityProvider, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::middleware::with_security_headers;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let api = apply_middleware(create_router(&state.rate_limiter()), state.config());
    api.merge(with_security_headers(health_routes())).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool, &config.database.migrations_dir)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    info!("Connecting to Redis...");
    let redis_pool = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let image_host: Option<Arc<dyn ImageHost>> = match config.image_host.clone() {
        Some(host) => Some(Arc::new(
            CloudinaryImageHost::new(host).map_err(|e| AppError::Config(e.to_string()))?,
        )),
        None => {
            warn!("No image host configured, photo uploads are disabled");
            None
        }
    };
    let identity_provider: Option<Arc<dyn IdentityProvider>> = match config.oauth.clone() {
        Some(oauth) => Some(Arc::new(
            GoogleIdentityProvider::new(oauth).map_err(|e| AppError::Config(e.to_string()))?,
        )),
        None => {
            info!("External sign-in not configured");
            None
        }
    };

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .challenge_repo(Arc::new(PgChallengeRepository::new(pool.clone())))
        .membership_repo(Arc::new(PgMembershipRepository::new(pool.clone())))
        .checkin_repo(Arc::new(PgCheckinRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .nudge_repo(Arc::new(PgNudgeRepository::new(pool.clone())))
        .notification_repo(Arc::new(PgNotificationRepository::new(pool.clone())))
        .achievement_repo(Arc::new(PgAchievementRepository::new(pool.clone())))
        .session_store(Arc::new(RedisSessionStore::new(redis_pool.clone())))
        .image_host(image_host)
        .identity_provider(identity_provider)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .admin(config.admin.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let rate_limiter = rate_limiter_for(config.rate_limit.backend, &redis_pool);
    info!(backend = ?config.rate_limit.backend, "Rate limiter ready");

    Ok(AppState::new(service_context, config, rate_limiter, pool, redis_pool))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
