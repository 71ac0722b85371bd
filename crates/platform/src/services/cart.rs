//! Cart synchronization service.
//!
//! Carts have no local source of truth: every operation is a fresh
//! transaction against the Provider, keyed by `(user, tenant)`. Local
//! validation runs first (fail fast, no remote call), then tenant and
//! credential resolution, then exactly one Provider call. Any resolution
//! failure short-circuits before the Provider is touched, so a
//! misconfigured or inactive tenant never leaks a request upstream.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use herba_core::{StrainId, UserId};

use crate::db::RepositoryError;
use crate::models::Tenant;
use crate::provider::types::Cart;
use crate::provider::{ProviderApi, ProviderError};
use crate::tenancy::TenantRef;

use super::credentials::{CredentialError, CredentialSource};
use super::directory::TenantDirectory;

/// Package sizes the Provider dispenses, in grams.
pub const ALLOWED_SIZES_GRAMS: [u32; 3] = [2, 5, 10];

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Package size outside the dispensable set.
    #[error("invalid package size: {0}g (allowed: 2g, 5g, 10g)")]
    InvalidSize(u32),

    /// Quantity below one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The reference resolved to no active tenant.
    #[error("tenant not found")]
    TenantNotFound,

    /// The patient has not completed their medical consultation.
    #[error("complete medical consultation first")]
    ConsultationRequired,

    /// Tenant Provider credentials are missing or undecryptable.
    #[error(transparent)]
    Credentials(CredentialError),

    /// The Provider call failed.
    #[error(transparent)]
    Provider(ProviderError),

    /// A store read failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

impl From<ProviderError> for CartError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::ConsultationRequired => Self::ConsultationRequired,
            other => Self::Provider(other),
        }
    }
}

impl From<CredentialError> for CartError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::TenantNotFound => Self::TenantNotFound,
            other => Self::Credentials(other),
        }
    }
}

/// Cart operations for tenant storefronts.
pub struct CartService {
    tenants: Arc<dyn TenantDirectory>,
    credentials: Arc<dyn CredentialSource>,
    provider: Arc<dyn ProviderApi>,
}

impl CartService {
    /// Create a cart service.
    pub fn new(
        tenants: Arc<dyn TenantDirectory>,
        credentials: Arc<dyn CredentialSource>,
        provider: Arc<dyn ProviderApi>,
    ) -> Self {
        Self {
            tenants,
            credentials,
            provider,
        }
    }

    /// Resolve tenant and credentials; the shared prefix of every operation.
    async fn resolve(
        &self,
        tenant_ref: &TenantRef,
    ) -> Result<(Tenant, herba_core::ProviderCredentials), CartError> {
        let tenant = self
            .tenants
            .find_active(tenant_ref)
            .await?
            .ok_or(CartError::TenantNotFound)?;
        let creds = self.credentials.get_credentials(&tenant.id).await?;
        Ok((tenant, creds))
    }

    /// Fetch the user's cart.
    ///
    /// # Errors
    ///
    /// Fails on unresolved tenant, missing credentials, or Provider failure.
    #[instrument(skip(self))]
    pub async fn get(&self, tenant_ref: &TenantRef, user_id: &UserId) -> Result<Cart, CartError> {
        let (_, creds) = self.resolve(tenant_ref).await?;
        Ok(self.provider.get_cart(&creds, user_id).await?)
    }

    /// Add a strain to the user's cart.
    ///
    /// Size and quantity are validated locally before any I/O.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidSize`/`InvalidQuantity` on bad input (no Provider
    /// call is made), `ConsultationRequired` when the Provider signals the
    /// consultation precondition, and the usual resolution failures.
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        tenant_ref: &TenantRef,
        user_id: &UserId,
        strain_id: &StrainId,
        quantity: u32,
        size_grams: u32,
    ) -> Result<Cart, CartError> {
        if !ALLOWED_SIZES_GRAMS.contains(&size_grams) {
            return Err(CartError::InvalidSize(size_grams));
        }
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let (_, creds) = self.resolve(tenant_ref).await?;
        Ok(self
            .provider
            .add_to_cart(&creds, user_id, strain_id, quantity, size_grams)
            .await?)
    }

    /// Remove a strain from the user's cart.
    ///
    /// # Errors
    ///
    /// Fails on unresolved tenant, missing credentials, or Provider failure.
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        tenant_ref: &TenantRef,
        user_id: &UserId,
        strain_id: &StrainId,
    ) -> Result<Cart, CartError> {
        let (_, creds) = self.resolve(tenant_ref).await?;
        Ok(self
            .provider
            .remove_from_cart(&creds, user_id, strain_id)
            .await?)
    }

    /// Empty the user's cart.
    ///
    /// # Errors
    ///
    /// Fails on unresolved tenant, missing credentials, or Provider failure.
    #[instrument(skip(self))]
    pub async fn clear(&self, tenant_ref: &TenantRef, user_id: &UserId) -> Result<Cart, CartError> {
        let (_, creds) = self.resolve(tenant_ref).await?;
        Ok(self.provider.clear_cart(&creds, user_id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use herba_core::{OrderId, ProviderCredentials, TenantId};

    use crate::provider::types::{
        CartItem, NewPatient, PatientRegistration, RemoteOrder, Strain,
    };
    use crate::tenancy::TenantRefKind;

    use super::*;

    pub(crate) fn tenant_ref(reference: &str) -> TenantRef {
        TenantRef {
            reference: reference.to_owned(),
            kind: TenantRefKind::PathSlug,
        }
    }

    pub(crate) fn tenant(id: &str) -> Tenant {
        Tenant {
            id: TenantId::new(id),
            name: id.to_owned(),
            subdomain: id.to_owned(),
            custom_domain: None,
            country_code: "DE".to_owned(),
            is_active: true,
            api_key: Some("pk_test".to_owned()),
            secret_key_ciphertext: Some("ciphertext".to_owned()),
            settings: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Directory double returning a fixed tenant (or none).
    pub(crate) struct StubDirectory(pub Option<Tenant>);

    #[async_trait]
    impl TenantDirectory for StubDirectory {
        async fn find_active(&self, _: &TenantRef) -> Result<Option<Tenant>, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    /// Credential source double.
    pub(crate) enum StubCredentials {
        Valid,
        MissingSecret,
    }

    #[async_trait]
    impl CredentialSource for StubCredentials {
        async fn get_credentials(
            &self,
            _: &TenantId,
        ) -> Result<ProviderCredentials, CredentialError> {
            match self {
                Self::Valid => Ok(ProviderCredentials::new("pk_test", "sk_test")),
                Self::MissingSecret => Err(CredentialError::MissingSecret),
            }
        }
    }

    /// Provider double counting every call, optionally failing `add_to_cart`.
    #[derive(Default)]
    pub(crate) struct CountingProvider {
        pub calls: AtomicUsize,
        pub consultation_pending: bool,
    }

    impl CountingProvider {
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn one_item_cart() -> Cart {
            Cart {
                items: vec![CartItem {
                    strain_id: StrainId::new("s1"),
                    name: "Northern Lights".to_owned(),
                    quantity: 2,
                    size_grams: 5,
                    price: Decimal::new(1150, 2),
                }],
                total: Decimal::new(2300, 2),
            }
        }
    }

    #[async_trait]
    impl ProviderApi for CountingProvider {
        async fn fetch_products(
            &self,
            _: &ProviderCredentials,
            _: &str,
        ) -> Result<Vec<Strain>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn create_patient(
            &self,
            _: &ProviderCredentials,
            _: &NewPatient,
        ) -> Result<PatientRegistration, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PatientRegistration {
                client_id: herba_core::ClientId::new("client-1"),
                kyc_link: "https://kyc.provider.example/start".to_owned(),
            })
        }

        async fn get_cart(
            &self,
            _: &ProviderCredentials,
            _: &UserId,
        ) -> Result<Cart, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::one_item_cart())
        }

        async fn add_to_cart(
            &self,
            _: &ProviderCredentials,
            _: &UserId,
            _: &StrainId,
            _: u32,
            _: u32,
        ) -> Result<Cart, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.consultation_pending {
                return Err(ProviderError::ConsultationRequired);
            }
            Ok(Self::one_item_cart())
        }

        async fn remove_from_cart(
            &self,
            _: &ProviderCredentials,
            _: &UserId,
            _: &StrainId,
        ) -> Result<Cart, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Cart::default())
        }

        async fn clear_cart(
            &self,
            _: &ProviderCredentials,
            _: &UserId,
        ) -> Result<Cart, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Cart::default())
        }

        async fn get_order(
            &self,
            _: &ProviderCredentials,
            _: &OrderId,
        ) -> Result<RemoteOrder, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RemoteOrder {
                id: OrderId::new("ord_1"),
                status: herba_core::OrderStatus::Shipped,
                items: vec![],
            })
        }
    }

    fn service(
        directory: StubDirectory,
        credentials: StubCredentials,
        provider: Arc<CountingProvider>,
    ) -> CartService {
        CartService::new(Arc::new(directory), Arc::new(credentials), provider)
    }

    #[tokio::test]
    async fn add_rejects_invalid_size_without_provider_call() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(
            StubDirectory(Some(tenant("acme"))),
            StubCredentials::Valid,
            Arc::clone(&provider),
        );

        let result = svc
            .add(&tenant_ref("acme"), &UserId::new("user-1"), &StrainId::new("s1"), 1, 3)
            .await;

        assert!(matches!(result, Err(CartError::InvalidSize(3))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn add_rejects_zero_quantity_without_provider_call() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(
            StubDirectory(Some(tenant("acme"))),
            StubCredentials::Valid,
            Arc::clone(&provider),
        );

        let result = svc
            .add(&tenant_ref("acme"), &UserId::new("user-1"), &StrainId::new("s1"), 0, 5)
            .await;

        assert!(matches!(result, Err(CartError::InvalidQuantity)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn add_translates_consultation_precondition() {
        let provider = Arc::new(CountingProvider {
            consultation_pending: true,
            ..CountingProvider::default()
        });
        let svc = service(
            StubDirectory(Some(tenant("acme"))),
            StubCredentials::Valid,
            Arc::clone(&provider),
        );

        let result = svc
            .add(&tenant_ref("acme"), &UserId::new("user-1"), &StrainId::new("s1"), 2, 5)
            .await;

        // Its own variant, not a generic Provider error
        assert!(matches!(result, Err(CartError::ConsultationRequired)));
    }

    #[tokio::test]
    async fn add_happy_path_returns_provider_cart_verbatim() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(
            StubDirectory(Some(tenant("acme"))),
            StubCredentials::Valid,
            Arc::clone(&provider),
        );

        let cart = svc
            .add(&tenant_ref("acme"), &UserId::new("user-1"), &StrainId::new("s1"), 2, 5)
            .await
            .unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().unwrap().strain_id, StrainId::new("s1"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn missing_secret_short_circuits_before_provider() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(
            StubDirectory(Some(tenant("acme"))),
            StubCredentials::MissingSecret,
            Arc::clone(&provider),
        );

        let result = svc.get(&tenant_ref("acme"), &UserId::new("user-1")).await;

        assert!(matches!(
            result,
            Err(CartError::Credentials(CredentialError::MissingSecret))
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_tenant_short_circuits_before_provider() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(
            StubDirectory(None),
            StubCredentials::Valid,
            Arc::clone(&provider),
        );

        let result = svc.clear(&tenant_ref("ghost"), &UserId::new("user-1")).await;

        assert!(matches!(result, Err(CartError::TenantNotFound)));
        assert_eq!(provider.call_count(), 0);
    }
}
