//! Database operations for the platform `PostgreSQL` instance.
//!
//! # Tables
//!
//! - `tenant` - Dispensary storefronts and their (encrypted) Provider credentials
//! - `order` - Locally persisted order records (Provider is order of record)
//! - `audit_log` - Append-only audit trail
//! - `sessions` - Tower-sessions storage
//!
//! The Provider owns cart and catalog state; neither is persisted locally.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/platform/migrations/` and run via:
//! ```bash
//! cargo run -p herba-cli -- migrate
//! ```

pub mod audit;
pub mod orders;
pub mod tenants;

pub use orders::OrderRepository;
pub use tenants::TenantRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
