//! Provider REST client implementation.
//!
//! Uses `reqwest` directly against the Provider's JSON endpoints. Every
//! request carries the calling tenant's credentials in the `x-api-key` /
//! `x-api-secret` headers; the client itself is credential-free and shared
//! across all tenants.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use herba_core::{OrderId, ProviderCredentials, StrainId, UserId};

use crate::config::ProviderConfig;

use super::ProviderError;
use super::types::{
    Cart, NewPatient, PatientRegistration, ProviderErrorBody, RemoteOrder, Strain,
};

/// Header carrying the tenant's Provider API key.
const API_KEY_HEADER: &str = "x-api-key";
/// Header carrying the tenant's Provider secret key.
const API_SECRET_HEADER: &str = "x-api-secret";

/// Error code the Provider uses for the consultation precondition.
const CONSULTATION_REQUIRED_CODE: &str = "consultation_required";

/// Client for the Provider REST API.
#[derive(Clone)]
pub struct ProviderClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProviderClient {
    /// Create a new Provider API client.
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        creds: &ProviderCredentials,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header(API_KEY_HEADER, &creds.api_key)
            .header(API_SECRET_HEADER, creds.expose_secret_key())
    }

    /// Send a request and deserialize the success body.
    ///
    /// Non-2xx responses are read as structured error bodies; the
    /// consultation precondition maps to its own error variant so callers
    /// can translate it without message matching.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error_body: ProviderErrorBody = serde_json::from_str(&body).unwrap_or_default();

            if error_body.error_code.as_deref() == Some(CONSULTATION_REQUIRED_CODE) {
                return Err(ProviderError::ConsultationRequired);
            }

            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Provider API returned non-success status"
            );
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_body
                    .message
                    .unwrap_or_else(|| body.chars().take(200).collect()),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse Provider response"
                );
                Err(ProviderError::Parse(e))
            }
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        creds: &ProviderCredentials,
    ) -> Result<T, ProviderError> {
        self.execute(self.request(reqwest::Method::GET, path, creds))
            .await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        creds: &ProviderCredentials,
        body: &B,
    ) -> Result<T, ProviderError> {
        self.execute(self.request(reqwest::Method::POST, path, creds).json(body))
            .await
    }

    async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        creds: &ProviderCredentials,
    ) -> Result<T, ProviderError> {
        self.execute(self.request(reqwest::Method::DELETE, path, creds))
            .await
    }
}

#[derive(Serialize)]
struct AddToCartBody<'a> {
    strain_id: &'a StrainId,
    quantity: u32,
    size_grams: u32,
}

#[async_trait]
impl super::ProviderApi for ProviderClient {
    #[instrument(skip(self, creds))]
    async fn fetch_products(
        &self,
        creds: &ProviderCredentials,
        country_code: &str,
    ) -> Result<Vec<Strain>, ProviderError> {
        self.get(&format!("/v1/products?country={country_code}"), creds)
            .await
    }

    #[instrument(skip(self, creds, patient))]
    async fn create_patient(
        &self,
        creds: &ProviderCredentials,
        patient: &NewPatient,
    ) -> Result<PatientRegistration, ProviderError> {
        self.post("/v1/patients", creds, patient).await
    }

    #[instrument(skip(self, creds))]
    async fn get_cart(
        &self,
        creds: &ProviderCredentials,
        user_id: &UserId,
    ) -> Result<Cart, ProviderError> {
        self.get(&format!("/v1/customers/{user_id}/cart"), creds)
            .await
    }

    #[instrument(skip(self, creds))]
    async fn add_to_cart(
        &self,
        creds: &ProviderCredentials,
        user_id: &UserId,
        strain_id: &StrainId,
        quantity: u32,
        size_grams: u32,
    ) -> Result<Cart, ProviderError> {
        let body = AddToCartBody {
            strain_id,
            quantity,
            size_grams,
        };
        self.post(&format!("/v1/customers/{user_id}/cart/items"), creds, &body)
            .await
    }

    #[instrument(skip(self, creds))]
    async fn remove_from_cart(
        &self,
        creds: &ProviderCredentials,
        user_id: &UserId,
        strain_id: &StrainId,
    ) -> Result<Cart, ProviderError> {
        self.delete(
            &format!("/v1/customers/{user_id}/cart/items/{strain_id}"),
            creds,
        )
        .await
    }

    #[instrument(skip(self, creds))]
    async fn clear_cart(
        &self,
        creds: &ProviderCredentials,
        user_id: &UserId,
    ) -> Result<Cart, ProviderError> {
        self.delete(&format!("/v1/customers/{user_id}/cart"), creds)
            .await
    }

    #[instrument(skip(self, creds))]
    async fn get_order(
        &self,
        creds: &ProviderCredentials,
        order_id: &OrderId,
    ) -> Result<RemoteOrder, ProviderError> {
        self.get(&format!("/v1/orders/{order_id}"), creds).await
    }
}
