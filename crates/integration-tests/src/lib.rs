//! Integration tests for Herba.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p herba-cli -- migrate
//!
//! # Start the platform server
//! cargo run -p herba-platform
//!
//! # Run the ignored integration tests
//! cargo test -p herba-integration-tests -- --ignored
//! ```
//!
//! Tests target a live server; cases that need one carry
//! `#[ignore = "..."]` so `cargo test` stays green without infrastructure.

use reqwest::Client;

/// Shared context for live-server tests.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Create a context against `PLATFORM_BASE_URL` (default
    /// `http://localhost:3000`).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("PLATFORM_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Build a URL under the configured base.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Connect to the platform database for test seeding.
    ///
    /// Honors `PLATFORM_DATABASE_URL` with a `DATABASE_URL` fallback, same
    /// as the server.
    ///
    /// # Panics
    ///
    /// Panics if neither variable is set or the connection fails.
    pub async fn db(&self) -> sqlx::PgPool {
        let url = std::env::var("PLATFORM_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("PLATFORM_DATABASE_URL must be set for database-backed tests");
        sqlx::PgPool::connect(&url)
            .await
            .expect("Failed to connect to platform database")
    }
}

/// Seed a tenant row directly, bypassing the CLI. Returns the tenant ID.
///
/// Credentials are left unset so Provider-dependent endpoints answer with a
/// configuration error rather than calling a live Provider.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn seed_tenant(pool: &sqlx::PgPool, subdomain: &str, is_active: bool) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO tenant (id, name, subdomain, country_code, is_active) \
         VALUES ($1, $2, $3, 'DE', $4)",
    )
    .bind(&id)
    .bind(format!("Test tenant {subdomain}"))
    .bind(subdomain)
    .bind(is_active)
    .execute(pool)
    .await
    .expect("Failed to seed tenant");
    id
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
