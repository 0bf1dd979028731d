//! Database migration management.
//!
//! Embeds SQL migrations and applies them automatically using `SQLx`'s
//! built-in migration support with compile-time embedding.

use sqlx::{Pool, Sqlite};
use vigil_core::StorageError;

/// Run all pending database migrations.
///
/// Applies every migration under `migrations/` that has not been applied
/// yet. `SQLx` tracks applied migrations in a `_sqlx_migrations` table.
///
/// # Errors
/// Returns `StorageError::Backend` if any migration fails to execute.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StorageError> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StorageError::Backend(format!("migration execution failed: {e}")))?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
