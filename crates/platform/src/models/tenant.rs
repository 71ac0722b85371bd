//! Tenant domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use herba_core::TenantId;

/// A dispensary storefront on the platform.
///
/// Tenants are soft-deactivated via `is_active`, never hard-deleted. The
/// Provider secret is stored only as ciphertext; decryption happens in the
/// credential vault, per operation.
#[derive(Debug, Clone, Serialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    /// Globally unique subdomain label under the platform root domain.
    pub subdomain: String,
    /// Optional custom domain the tenant has pointed at the platform.
    pub custom_domain: Option<String>,
    /// ISO 3166-1 alpha-2 country code, forwarded to the Provider catalog.
    pub country_code: String,
    pub is_active: bool,
    /// Provider API key (plaintext; not a secret on its own).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Provider secret key ciphertext, `base64(nonce || ciphertext)`.
    #[serde(skip_serializing)]
    pub secret_key_ciphertext: Option<String>,
    /// Arbitrary storefront settings (consent flags, design tokens).
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
