//! Credential vault: per-tenant Provider credential resolution.
//!
//! Exactly one store read and one decrypt per call, and no caching: tenant
//! admins can rotate credentials at any time, so staleness is unacceptable.
//! Error values describe the failure class only - key material and
//! plaintext never appear in errors or logs.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use herba_core::crypto;
use herba_core::{ProviderCredentials, TenantId};

use crate::config::CredentialsKey;
use crate::db::{RepositoryError, TenantRepository};

/// Errors resolving a tenant's Provider credentials.
///
/// All variants are tenant configuration problems (admin-fixable), not
/// client-fixable input problems.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No such tenant, or the tenant is deactivated.
    #[error("tenant not found or inactive")]
    TenantNotFound,

    /// The tenant has no Provider API key configured.
    #[error("tenant has no Provider API key configured")]
    MissingApiKey,

    /// The tenant has no Provider secret configured.
    #[error("tenant has no Provider secret configured")]
    MissingSecret,

    /// The stored ciphertext could not be decrypted (corrupt data or a
    /// rotated process key).
    #[error("tenant Provider secret could not be decrypted")]
    Decrypt,

    /// The store read failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

/// Source of per-tenant Provider credentials.
///
/// The seam that lets cart/order tests run without a database or a real
/// decryption key.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Resolve and decrypt a tenant's Provider credential pair.
    async fn get_credentials(
        &self,
        tenant_id: &TenantId,
    ) -> Result<ProviderCredentials, CredentialError>;
}

/// Database-backed credential vault.
pub struct CredentialVault {
    pool: PgPool,
    key: CredentialsKey,
}

impl CredentialVault {
    /// Create a vault over the given pool and process-wide key.
    #[must_use]
    pub const fn new(pool: PgPool, key: CredentialsKey) -> Self {
        Self { pool, key }
    }
}

#[async_trait]
impl CredentialSource for CredentialVault {
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    async fn get_credentials(
        &self,
        tenant_id: &TenantId,
    ) -> Result<ProviderCredentials, CredentialError> {
        let tenant = TenantRepository::new(&self.pool)
            .get_by_id(tenant_id)
            .await?
            .ok_or(CredentialError::TenantNotFound)?;

        decrypt_tenant_credentials(&self.key, tenant)
    }
}

/// Turn a tenant row into a decrypted credential pair.
fn decrypt_tenant_credentials(
    key: &CredentialsKey,
    tenant: crate::models::Tenant,
) -> Result<ProviderCredentials, CredentialError> {
    if !tenant.is_active {
        return Err(CredentialError::TenantNotFound);
    }

    let api_key = tenant
        .api_key
        .filter(|k| !k.is_empty())
        .ok_or(CredentialError::MissingApiKey)?;

    let ciphertext = tenant
        .secret_key_ciphertext
        .filter(|c| !c.is_empty())
        .ok_or(CredentialError::MissingSecret)?;

    let secret_key = crypto::decrypt_secret(key.as_bytes(), &ciphertext)
        .map_err(|_| CredentialError::Decrypt)?;

    // A pair with an empty secret is never handed out.
    if secret_key.is_empty() {
        return Err(CredentialError::MissingSecret);
    }

    Ok(ProviderCredentials::new(api_key, secret_key))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use chrono::Utc;

    use crate::models::Tenant;

    use super::*;

    fn key() -> CredentialsKey {
        let encoded = STANDARD.encode([7u8; 32]);
        CredentialsKey::from_base64("TEST_KEY", &encoded).unwrap()
    }

    fn tenant_row(api_key: Option<&str>, ciphertext: Option<&str>, is_active: bool) -> Tenant {
        Tenant {
            id: TenantId::new("acme"),
            name: "Acme".to_owned(),
            subdomain: "acme".to_owned(),
            custom_domain: None,
            country_code: "DE".to_owned(),
            is_active,
            api_key: api_key.map(str::to_owned),
            secret_key_ciphertext: ciphertext.map(str::to_owned),
            settings: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn valid_row_decrypts_to_pair() {
        let key = key();
        let ciphertext = crypto::encrypt_secret(key.as_bytes(), "sk_live_secret").unwrap();
        let row = tenant_row(Some("pk_live"), Some(&ciphertext), true);

        let creds = decrypt_tenant_credentials(&key, row).unwrap();

        assert_eq!(creds.api_key, "pk_live");
        assert_eq!(creds.expose_secret_key(), "sk_live_secret");
    }

    #[test]
    fn inactive_tenant_reads_as_not_found() {
        let key = key();
        let ciphertext = crypto::encrypt_secret(key.as_bytes(), "sk").unwrap();
        let row = tenant_row(Some("pk"), Some(&ciphertext), false);

        assert!(matches!(
            decrypt_tenant_credentials(&key, row),
            Err(CredentialError::TenantNotFound)
        ));
    }

    #[test]
    fn missing_api_key_is_typed() {
        let row = tenant_row(None, Some("anything"), true);
        assert!(matches!(
            decrypt_tenant_credentials(&key(), row),
            Err(CredentialError::MissingApiKey)
        ));
    }

    #[test]
    fn empty_ciphertext_is_missing_secret() {
        let row = tenant_row(Some("pk"), Some(""), true);
        assert!(matches!(
            decrypt_tenant_credentials(&key(), row),
            Err(CredentialError::MissingSecret)
        ));
    }

    #[test]
    fn corrupt_ciphertext_is_decrypt_failure() {
        let row = tenant_row(Some("pk"), Some("bm90IGEgcmVhbCBjaXBoZXJ0ZXh0IGF0IGFsbA=="), true);
        assert!(matches!(
            decrypt_tenant_credentials(&key(), row),
            Err(CredentialError::Decrypt)
        ));
    }

    #[test]
    fn empty_decrypted_secret_is_never_handed_out() {
        let key = key();
        let ciphertext = crypto::encrypt_secret(key.as_bytes(), "").unwrap();
        let row = tenant_row(Some("pk"), Some(&ciphertext), true);

        assert!(matches!(
            decrypt_tenant_credentials(&key, row),
            Err(CredentialError::MissingSecret)
        ));
    }
}
