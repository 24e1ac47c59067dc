//! Schema migrations
//!
//! SQL files are read from a directory at runtime so the binary does not
//! need the database at compile time.

use std::path::Path;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Apply every pending migration found in `dir`
pub async fn run_migrations(pool: &PgPool, dir: impl AsRef<Path>) -> Result<(), MigrateError> {
    let dir = dir.as_ref();
    let migrator = Migrator::new(dir).await?;
    info!(path = %dir.display(), count = migrator.iter().count(), "Applying migrations");
    migrator.run(pool).await
}
