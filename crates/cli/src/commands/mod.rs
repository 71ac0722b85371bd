//! CLI command implementations.

pub mod migrate;
pub mod tenant;

use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid {0}: {1}")]
    Invalid(&'static str, String),

    #[error("No tenant with id {0}")]
    TenantNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Encryption error: {0}")]
    Crypto(#[from] herba_core::crypto::CryptoError),
}

/// Connect to the platform database.
///
/// Honors `PLATFORM_DATABASE_URL` with a `DATABASE_URL` fallback, matching
/// the server's configuration loading.
pub(crate) async fn connect() -> Result<sqlx::PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("PLATFORM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("PLATFORM_DATABASE_URL"))?;

    Ok(sqlx::PgPool::connect(&database_url).await?)
}
