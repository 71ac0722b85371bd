//! Database migration command.
//!
//! Migrations live in `crates/platform/migrations/` and are embedded at
//! compile time; the server never runs them on startup.

use super::CliError;

/// Run platform database migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running platform migrations...");
    sqlx::migrate!("../platform/migrations").run(&pool).await?;

    tracing::info!("Platform migrations complete");
    Ok(())
}
