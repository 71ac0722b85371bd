//! Order read service with Provider reconciliation.
//!
//! Local order rows are a cache of what was placed; the Provider holds the
//! order of record. Single-order reads refresh status and line items from
//! the Provider in memory before returning - nothing is written back, so a
//! Provider wobble can never corrupt the local row.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use herba_core::{OrderId, TenantId, UserId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{Order, OrderItem};
use crate::provider::types::RemoteOrder;
use crate::provider::{ProviderApi, ProviderError};
use crate::tenancy::TenantRef;

use super::credentials::{CredentialError, CredentialSource};
use super::directory::TenantDirectory;

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The reference resolved to no active tenant.
    #[error("tenant not found")]
    TenantNotFound,

    /// No such order within this tenant for this user.
    ///
    /// Covers both a genuinely absent row and an order belonging to someone
    /// else; callers cannot tell the two apart.
    #[error("order not found")]
    NotFound,

    /// Tenant Provider credentials are missing or undecryptable.
    #[error(transparent)]
    Credentials(CredentialError),

    /// The Provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A store read failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

impl From<CredentialError> for OrderError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::TenantNotFound => Self::TenantNotFound,
            other => Self::Credentials(other),
        }
    }
}

/// Read access to locally persisted orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fetch an order by ID within a tenant.
    async fn get_scoped(
        &self,
        order_id: &OrderId,
        tenant_id: &TenantId,
    ) -> Result<Option<Order>, RepositoryError>;

    /// List a user's orders within a tenant, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
    ) -> Result<Vec<Order>, RepositoryError>;
}

/// `PostgreSQL`-backed order store.
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn get_scoped(
        &self,
        order_id: &OrderId,
        tenant_id: &TenantId,
    ) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(&self.pool)
            .get_scoped(order_id, tenant_id)
            .await
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
    ) -> Result<Vec<Order>, RepositoryError> {
        OrderRepository::new(&self.pool)
            .list_for_user(user_id, tenant_id)
            .await
    }
}

/// Order reads for tenant storefronts.
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    tenants: Arc<dyn TenantDirectory>,
    credentials: Arc<dyn CredentialSource>,
    provider: Arc<dyn ProviderApi>,
}

impl OrderService {
    /// Create an order service.
    pub fn new(
        store: Arc<dyn OrderStore>,
        tenants: Arc<dyn TenantDirectory>,
        credentials: Arc<dyn CredentialSource>,
        provider: Arc<dyn ProviderApi>,
    ) -> Self {
        Self {
            store,
            tenants,
            credentials,
            provider,
        }
    }

    /// Fetch a single order, refreshed against the Provider.
    ///
    /// The order must exist within the tenant and belong to `user_id`;
    /// anything else is `NotFound`.
    ///
    /// # Errors
    ///
    /// Fails on unresolved tenant, missing order, missing credentials, or
    /// Provider failure.
    #[instrument(skip(self))]
    pub async fn get_order(
        &self,
        tenant_ref: &TenantRef,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<Order, OrderError> {
        let tenant = self
            .tenants
            .find_active(tenant_ref)
            .await?
            .ok_or(OrderError::TenantNotFound)?;

        let local = self
            .store
            .get_scoped(order_id, &tenant.id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if local.user_id != *user_id {
            return Err(OrderError::NotFound);
        }

        let creds = self.credentials.get_credentials(&tenant.id).await?;
        let remote = self.provider.get_order(&creds, order_id).await?;

        Ok(merge_remote(local, remote))
    }

    /// List the user's orders within a tenant from the local store.
    ///
    /// Listings are served without a per-order Provider round trip; the
    /// single-order read is the refresh point.
    ///
    /// # Errors
    ///
    /// Fails on unresolved tenant or a store read failure.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        tenant_ref: &TenantRef,
        user_id: &UserId,
    ) -> Result<Vec<Order>, OrderError> {
        let tenant = self
            .tenants
            .find_active(tenant_ref)
            .await?
            .ok_or(OrderError::TenantNotFound)?;

        Ok(self.store.list_for_user(user_id, &tenant.id).await?)
    }
}

/// Reconcile a local order with the Provider's view.
///
/// Status always follows the Provider. Line items follow the Provider only
/// when it reports any; an empty remote item list keeps the local items so a
/// partial Provider response never erases what the patient ordered.
/// `admin_notes` is local-only and always kept.
fn merge_remote(mut local: Order, remote: RemoteOrder) -> Order {
    local.status = remote.status;

    if !remote.items.is_empty() {
        local.items = remote
            .items
            .into_iter()
            .map(|item| OrderItem {
                strain_id: item.strain_id,
                name: item.name,
                quantity: item.quantity,
                size_grams: item.size_grams,
                price: item.price,
            })
            .collect();
    }

    local
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use herba_core::{OrderStatus, StrainId};

    use crate::provider::types::CartItem;
    use crate::services::cart::tests::{
        CountingProvider, StubCredentials, StubDirectory, tenant, tenant_ref,
    };

    use super::*;

    fn local_order(user: &str) -> Order {
        Order {
            id: OrderId::new("ord_1"),
            tenant_id: TenantId::new("acme"),
            user_id: UserId::new(user),
            items: vec![OrderItem {
                strain_id: StrainId::new("s1"),
                name: "Northern Lights".to_owned(),
                quantity: 1,
                size_grams: 5,
                price: Decimal::new(1150, 2),
            }],
            status: OrderStatus::Pending,
            admin_notes: Some("call patient before dispatch".to_owned()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct StubStore(Option<Order>);

    #[async_trait]
    impl OrderStore for StubStore {
        async fn get_scoped(
            &self,
            _: &OrderId,
            _: &TenantId,
        ) -> Result<Option<Order>, RepositoryError> {
            Ok(self.0.clone())
        }

        async fn list_for_user(
            &self,
            _: &UserId,
            _: &TenantId,
        ) -> Result<Vec<Order>, RepositoryError> {
            Ok(self.0.clone().into_iter().collect())
        }
    }

    fn service(store: StubStore, provider: Arc<CountingProvider>) -> OrderService {
        OrderService::new(
            Arc::new(store),
            Arc::new(StubDirectory(Some(tenant("acme")))),
            Arc::new(StubCredentials::Valid),
            provider,
        )
    }

    #[test]
    fn merge_takes_remote_status_and_keeps_notes() {
        let remote = RemoteOrder {
            id: OrderId::new("ord_1"),
            status: OrderStatus::Shipped,
            items: vec![],
        };

        let merged = merge_remote(local_order("user-1"), remote);

        assert_eq!(merged.status, OrderStatus::Shipped);
        assert_eq!(
            merged.admin_notes.as_deref(),
            Some("call patient before dispatch")
        );
        // Empty remote items must not erase the local ones
        assert_eq!(merged.items.len(), 1);
    }

    #[test]
    fn merge_takes_remote_items_when_present() {
        let remote = RemoteOrder {
            id: OrderId::new("ord_1"),
            status: OrderStatus::Processing,
            items: vec![CartItem {
                strain_id: StrainId::new("s2"),
                name: "Sour Diesel".to_owned(),
                quantity: 3,
                size_grams: 10,
                price: Decimal::new(900, 2),
            }],
        };

        let merged = merge_remote(local_order("user-1"), remote);

        assert_eq!(merged.items.len(), 1);
        assert_eq!(merged.items.first().unwrap().strain_id, StrainId::new("s2"));
        assert_eq!(merged.items.first().unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn get_order_refreshes_from_provider() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(StubStore(Some(local_order("user-1"))), Arc::clone(&provider));

        let order = svc
            .get_order(
                &tenant_ref("acme"),
                &UserId::new("user-1"),
                &OrderId::new("ord_1"),
            )
            .await
            .unwrap();

        // CountingProvider reports SHIPPED for every order
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn foreign_users_order_reads_as_not_found() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(
            StubStore(Some(local_order("someone-else"))),
            Arc::clone(&provider),
        );

        let result = svc
            .get_order(
                &tenant_ref("acme"),
                &UserId::new("user-1"),
                &OrderId::new("ord_1"),
            )
            .await;

        assert!(matches!(result, Err(OrderError::NotFound)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_order_reads_as_not_found() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(StubStore(None), Arc::clone(&provider));

        let result = svc
            .get_order(
                &tenant_ref("acme"),
                &UserId::new("user-1"),
                &OrderId::new("ord_1"),
            )
            .await;

        assert!(matches!(result, Err(OrderError::NotFound)));
    }

    #[tokio::test]
    async fn list_does_not_touch_provider() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(StubStore(Some(local_order("user-1"))), Arc::clone(&provider));

        let orders = svc
            .list_orders(&tenant_ref("acme"), &UserId::new("user-1"))
            .await
            .unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(provider.call_count(), 0);
    }
}
