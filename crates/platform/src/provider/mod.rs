//! Provider API client.
//!
//! # Architecture
//!
//! - The Provider owns catalog, cart, and order state; this layer is a thin,
//!   stateless RPC wrapper over its REST/JSON endpoints.
//! - Credentials are per-tenant and passed explicitly into every call -
//!   the client holds no ambient credentials, so a single shared client
//!   cannot leak one tenant's keys into another tenant's request.
//! - No retries and no caching: a stale catalog is worse than an explicit
//!   failure, and retry policy belongs to callers.
//!
//! # Example
//!
//! ```rust,ignore
//! use herba_platform::provider::{ProviderApi, ProviderClient};
//!
//! let client = ProviderClient::new(&config.provider);
//! let creds = vault.get_credentials(&tenant_id).await?;
//! let products = client.fetch_products(&creds, "DE").await?;
//! ```

mod client;
pub mod types;

pub use client::ProviderClient;

use async_trait::async_trait;
use thiserror::Error;

use herba_core::{OrderId, ProviderCredentials, StrainId, UserId};

use types::{Cart, NewPatient, PatientRegistration, RemoteOrder, Strain};

/// Errors that can occur when calling the Provider API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP transport failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Provider rejected the request because the patient has not
    /// completed their medical consultation. Distinguished by variant so
    /// callers never string-match messages.
    #[error("medical consultation not completed")]
    ConsultationRequired,

    /// The Provider returned a non-success status.
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON parsing of a Provider response failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The Provider API surface this platform consumes.
///
/// The single seam for all cart/order/catalog tests: production code uses
/// [`ProviderClient`], tests substitute a double.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Fetch the catalog available to patients in the given country.
    async fn fetch_products(
        &self,
        creds: &ProviderCredentials,
        country_code: &str,
    ) -> Result<Vec<Strain>, ProviderError>;

    /// Register a patient and start KYC.
    async fn create_patient(
        &self,
        creds: &ProviderCredentials,
        patient: &NewPatient,
    ) -> Result<PatientRegistration, ProviderError>;

    /// Fetch a patient's cart.
    async fn get_cart(
        &self,
        creds: &ProviderCredentials,
        user_id: &UserId,
    ) -> Result<Cart, ProviderError>;

    /// Add a line to a patient's cart.
    async fn add_to_cart(
        &self,
        creds: &ProviderCredentials,
        user_id: &UserId,
        strain_id: &StrainId,
        quantity: u32,
        size_grams: u32,
    ) -> Result<Cart, ProviderError>;

    /// Remove a strain from a patient's cart.
    async fn remove_from_cart(
        &self,
        creds: &ProviderCredentials,
        user_id: &UserId,
        strain_id: &StrainId,
    ) -> Result<Cart, ProviderError>;

    /// Empty a patient's cart.
    async fn clear_cart(
        &self,
        creds: &ProviderCredentials,
        user_id: &UserId,
    ) -> Result<Cart, ProviderError>;

    /// Fetch the Provider's authoritative view of an order.
    async fn get_order(
        &self,
        creds: &ProviderCredentials,
        order_id: &OrderId,
    ) -> Result<RemoteOrder, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Status {
            status: 502,
            message: "upstream unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "provider returned 502: upstream unavailable");
    }

    #[test]
    fn test_consultation_required_is_its_own_variant() {
        let err = ProviderError::ConsultationRequired;
        assert!(matches!(err, ProviderError::ConsultationRequired));
        assert_eq!(err.to_string(), "medical consultation not completed");
    }
}
