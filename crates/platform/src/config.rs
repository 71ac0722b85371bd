//! Platform configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PLATFORM_DATABASE_URL` - `PostgreSQL` connection string
//! - `PLATFORM_ROOT_DOMAIN` - Root domain tenants hang off (e.g., herba.shop)
//! - `PLATFORM_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `PLATFORM_CREDENTIALS_KEY` - Base64 32-byte key for tenant secret decryption
//! - `PROVIDER_BASE_URL` - Base URL of the Provider API
//!
//! ## Optional
//! - `PLATFORM_HOST` - Bind address (default: 127.0.0.1)
//! - `PLATFORM_PORT` - Listen port (default: 3000)
//! - `PLATFORM_INTERNAL_HOST_SUFFIX` - Internal deployment host suffix
//!   (default: .internal.herba.shop); hosts ending in this are never treated
//!   as tenant custom domains
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Platform application configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Tenant host classification configuration
    pub domains: DomainConfig,
    /// Symmetric key for decrypting tenant Provider secrets
    pub credentials_key: CredentialsKey,
    /// Provider API configuration
    pub provider: ProviderConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Host classification configuration for tenant resolution.
///
/// Both values are explicit configuration rather than literals so a
/// deployment host change cannot silently reclassify subdomains as tenant
/// custom domains.
#[derive(Debug, Clone)]
pub struct DomainConfig {
    /// Root domain tenant subdomains hang off (e.g., `herba.shop`)
    pub root_domain: String,
    /// Internal deployment host suffix (e.g., `.internal.herba.shop`)
    pub internal_host_suffix: String,
}

/// Provider API configuration.
///
/// Holds only the endpoint; credentials are per-tenant and resolved per call.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the Provider API (e.g., `https://api.provider.example`)
    pub base_url: String,
}

/// Process-wide AES-256-GCM key for tenant secret decryption.
///
/// Implements `Debug` manually so the key material can never be formatted.
#[derive(Clone)]
pub struct CredentialsKey([u8; 32]);

impl CredentialsKey {
    /// Parse a key from its base64 encoding.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the value is not valid base64 or does not
    /// decode to exactly 32 bytes.
    pub fn from_base64(var_name: &str, encoded: &str) -> Result<Self, ConfigError> {
        let bytes = STANDARD.decode(encoded).map_err(|_| {
            ConfigError::InvalidEnvVar(var_name.to_string(), "not valid base64".to_string())
        })?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| {
            ConfigError::InvalidEnvVar(var_name.to_string(), "must decode to 32 bytes".to_string())
        })?;
        Ok(Self(key))
    }

    /// Access the raw key bytes for cipher construction.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for CredentialsKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialsKey([REDACTED])")
    }
}

impl PlatformConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PLATFORM_DATABASE_URL")?;
        let host = get_env_or_default("PLATFORM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PLATFORM_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PLATFORM_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PLATFORM_PORT".to_string(), e.to_string()))?;
        let session_secret = get_validated_secret("PLATFORM_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "PLATFORM_SESSION_SECRET")?;

        let root_domain = get_required_env("PLATFORM_ROOT_DOMAIN")?;
        let internal_host_suffix = get_env_or_default(
            "PLATFORM_INTERNAL_HOST_SUFFIX",
            &format!(".internal.{root_domain}"),
        );
        let domains = DomainConfig {
            root_domain,
            internal_host_suffix,
        };

        let credentials_key_b64 = get_validated_secret("PLATFORM_CREDENTIALS_KEY")?;
        let credentials_key = CredentialsKey::from_base64(
            "PLATFORM_CREDENTIALS_KEY",
            credentials_key_b64.expose_secret(),
        )?;

        let provider = ProviderConfig {
            base_url: get_required_env("PROVIDER_BASE_URL")?,
        };
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            session_secret,
            domains,
            credentials_key,
            provider,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_credentials_key_from_base64() {
        let encoded = STANDARD.encode([7u8; 32]);
        let key = CredentialsKey::from_base64("TEST_KEY", &encoded).unwrap();
        assert_eq!(key.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn test_credentials_key_rejects_wrong_length() {
        let encoded = STANDARD.encode([7u8; 16]);
        assert!(CredentialsKey::from_base64("TEST_KEY", &encoded).is_err());
    }

    #[test]
    fn test_credentials_key_rejects_bad_base64() {
        assert!(CredentialsKey::from_base64("TEST_KEY", "not base64!!!").is_err());
    }

    #[test]
    fn test_credentials_key_debug_redacts() {
        let encoded = STANDARD.encode([7u8; 32]);
        let key = CredentialsKey::from_base64("TEST_KEY", &encoded).unwrap();
        assert_eq!(format!("{key:?}"), "CredentialsKey([REDACTED])");
    }
}
