//! Per-tenant Provider API credentials.

use secrecy::{ExposeSecret, SecretString};

/// A tenant's decrypted Provider API credential pair.
///
/// Ephemeral value object: produced by the credential vault for the duration
/// of a single operation, passed explicitly into each Provider call, and
/// never persisted or cached. The secret key is wrapped in [`SecretString`]
/// so it cannot leak through `Debug` or accidental serialization.
#[derive(Clone)]
pub struct ProviderCredentials {
    /// Public API key identifying the tenant to the Provider.
    pub api_key: String,
    /// Secret key authenticating the tenant to the Provider.
    pub secret_key: SecretString,
}

impl ProviderCredentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Expose the secret key for an outbound Provider request.
    ///
    /// Call this only at the HTTP boundary.
    #[must_use]
    pub fn expose_secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
