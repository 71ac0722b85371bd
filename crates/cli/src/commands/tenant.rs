//! Tenant management commands.
//!
//! Onboarding, activation, and Provider credential storage. This is the only
//! writer of credential ciphertext: the secret is encrypted here with the
//! process key and the server only ever decrypts.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sqlx::Row;
use uuid::Uuid;

use herba_core::crypto;

use super::CliError;

/// Load the AES-256-GCM key from `PLATFORM_CREDENTIALS_KEY`.
fn credentials_key() -> Result<[u8; 32], CliError> {
    let encoded = std::env::var("PLATFORM_CREDENTIALS_KEY")
        .map_err(|_| CliError::MissingEnvVar("PLATFORM_CREDENTIALS_KEY"))?;

    let bytes = STANDARD
        .decode(&encoded)
        .map_err(|_| CliError::Invalid("PLATFORM_CREDENTIALS_KEY", "not valid base64".into()))?;

    bytes.try_into().map_err(|_| {
        CliError::Invalid("PLATFORM_CREDENTIALS_KEY", "must decode to 32 bytes".into())
    })
}

/// Onboard a new tenant (inactive until credentials are set and it is
/// activated).
///
/// # Errors
///
/// Returns `CliError` if the insert fails (e.g. duplicate subdomain).
pub async fn create(name: &str, subdomain: &str, country: &str) -> Result<(), CliError> {
    let pool = super::connect().await?;
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO tenant (id, name, subdomain, country_code, is_active) \
         VALUES ($1, $2, $3, $4, false)",
    )
    .bind(&id)
    .bind(name)
    .bind(subdomain)
    .bind(country)
    .execute(&pool)
    .await?;

    tracing::info!(id = %id, subdomain = %subdomain, "Tenant created (inactive)");
    Ok(())
}

/// List all tenants.
///
/// # Errors
///
/// Returns `CliError` if the query fails.
pub async fn list() -> Result<(), CliError> {
    let pool = super::connect().await?;

    let rows = sqlx::query(
        "SELECT id, name, subdomain, custom_domain, is_active, \
         api_key IS NOT NULL AND secret_key_ciphertext IS NOT NULL AS has_credentials \
         FROM tenant ORDER BY created_at",
    )
    .fetch_all(&pool)
    .await?;

    for row in &rows {
        tracing::info!(
            id = %row.get::<String, _>("id"),
            name = %row.get::<String, _>("name"),
            subdomain = %row.get::<String, _>("subdomain"),
            custom_domain = %row.get::<Option<String>, _>("custom_domain").unwrap_or_default(),
            is_active = row.get::<bool, _>("is_active"),
            has_credentials = row.get::<bool, _>("has_credentials"),
            "tenant"
        );
    }
    tracing::info!("{} tenant(s)", rows.len());
    Ok(())
}

/// Toggle a tenant's activation flag.
///
/// # Errors
///
/// Returns `CliError::TenantNotFound` if no row matches.
pub async fn set_active(id: &str, is_active: bool) -> Result<(), CliError> {
    let pool = super::connect().await?;

    let result = sqlx::query("UPDATE tenant SET is_active = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(is_active)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CliError::TenantNotFound(id.to_owned()));
    }

    tracing::info!(id = %id, is_active, "Tenant activation updated");
    Ok(())
}

/// Store a tenant's Provider API key and encrypted secret.
///
/// The plaintext secret exists only in this process; what lands in the
/// database is `base64(nonce || ciphertext)`.
///
/// # Errors
///
/// Returns `CliError` on a missing key, encryption failure, or missing
/// tenant.
pub async fn set_credentials(id: &str, api_key: &str, secret_key: &str) -> Result<(), CliError> {
    if api_key.is_empty() || secret_key.is_empty() {
        return Err(CliError::Invalid(
            "credentials",
            "api key and secret key must be non-empty".into(),
        ));
    }

    // connect() loads .env, which may carry the key
    let pool = super::connect().await?;

    let key = credentials_key()?;
    let ciphertext = crypto::encrypt_secret(&key, secret_key)?;
    let result = sqlx::query(
        "UPDATE tenant SET api_key = $2, secret_key_ciphertext = $3, updated_at = now() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(api_key)
    .bind(&ciphertext)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CliError::TenantNotFound(id.to_owned()));
    }

    tracing::info!(id = %id, "Provider credentials stored");
    Ok(())
}
