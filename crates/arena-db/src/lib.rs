//! # arena-db
//!
//! Database layer implementing the arena-core repository traits with PostgreSQL via SQLx.
//!
//! - Connection pool management and runtime migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations, including the transactional check-in,
//!   completion, award and nudge writes
//!
//! ```rust,ignore
//! use arena_db::{create_pool, run_migrations, DatabaseConfig, PgUserRepository};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! run_migrations(&pool, "migrations").await?;
//! let users = PgUserRepository::new(pool);
//! ```

pub mod mappers;
pub mod migrate;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use migrate::run_migrations;
pub use pool::{create_pool, ping, DatabaseConfig, PgPool};
pub use repositories::{
    PgAchievementRepository, PgChallengeRepository, PgCheckinRepository, PgCommentRepository,
    PgMembershipRepository, PgNotificationRepository, PgNudgeRepository, PgReactionRepository,
    PgUserRepository,
};
