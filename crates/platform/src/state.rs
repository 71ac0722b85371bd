//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::PlatformConfig;
use crate::provider::{ProviderApi, ProviderClient};
use crate::services::orders::PgOrderStore;
use crate::services::{
    AuditSink, CartService, CredentialSource, CredentialVault, OrderService, PgTenantDirectory,
    TenantDirectory,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PlatformConfig,
    pool: PgPool,
    directory: Arc<dyn TenantDirectory>,
    credentials: Arc<dyn CredentialSource>,
    provider: Arc<dyn ProviderApi>,
    cart: CartService,
    orders: OrderService,
    audit: AuditSink,
}

impl AppState {
    /// Create a new application state, wiring the service graph.
    ///
    /// Directory, vault, and Provider client are shared across the cart and
    /// order services; all of them are stateless over the pool and the
    /// process key.
    #[must_use]
    pub fn new(config: PlatformConfig, pool: PgPool) -> Self {
        let provider: Arc<dyn ProviderApi> = Arc::new(ProviderClient::new(&config.provider));
        let directory: Arc<dyn TenantDirectory> = Arc::new(PgTenantDirectory::new(pool.clone()));
        let credentials: Arc<dyn CredentialSource> = Arc::new(CredentialVault::new(
            pool.clone(),
            config.credentials_key.clone(),
        ));

        let cart = CartService::new(
            Arc::clone(&directory),
            Arc::clone(&credentials),
            Arc::clone(&provider),
        );
        let orders = OrderService::new(
            Arc::new(PgOrderStore::new(pool.clone())),
            Arc::clone(&directory),
            Arc::clone(&credentials),
            Arc::clone(&provider),
        );
        let audit = AuditSink::new(pool.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                directory,
                credentials,
                provider,
                cart,
                orders,
                audit,
            }),
        }
    }

    /// Get a reference to the platform configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the tenant directory.
    #[must_use]
    pub fn directory(&self) -> &Arc<dyn TenantDirectory> {
        &self.inner.directory
    }

    /// Get a reference to the credential source.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialSource> {
        &self.inner.credentials
    }

    /// Get a reference to the Provider API client.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn ProviderApi> {
        &self.inner.provider
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Get a reference to the audit sink.
    #[must_use]
    pub fn audit(&self) -> &AuditSink {
        &self.inner.audit
    }
}
