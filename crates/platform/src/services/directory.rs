//! Tenant lookup seam.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{RepositoryError, TenantRepository};
use crate::models::Tenant;
use crate::tenancy::TenantRef;

/// Maps resolved tenant references to tenant rows.
///
/// A reference matching no active tenant yields `Ok(None)`; callers surface
/// that as tenant-not-found, never as a fallback.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Find the active tenant a reference points at.
    async fn find_active(&self, tenant_ref: &TenantRef) -> Result<Option<Tenant>, RepositoryError>;
}

/// `PostgreSQL`-backed tenant directory.
pub struct PgTenantDirectory {
    pool: PgPool,
}

impl PgTenantDirectory {
    /// Create a directory over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn find_active(&self, tenant_ref: &TenantRef) -> Result<Option<Tenant>, RepositoryError> {
        TenantRepository::new(&self.pool)
            .get_active_by_reference(tenant_ref)
            .await
    }
}
