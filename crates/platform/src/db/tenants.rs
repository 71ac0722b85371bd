//! Tenant repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use herba_core::TenantId;

use super::RepositoryError;
use crate::models::Tenant;
use crate::tenancy::{TenantRef, TenantRefKind};

/// Database row for the `tenant` table.
#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    id: String,
    name: String,
    subdomain: String,
    custom_domain: Option<String>,
    country_code: String,
    is_active: bool,
    api_key: Option<String>,
    secret_key_ciphertext: Option<String>,
    settings: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Self {
            id: TenantId::new(row.id),
            name: row.name,
            subdomain: row.subdomain,
            custom_domain: row.custom_domain,
            country_code: row.country_code,
            is_active: row.is_active,
            api_key: row.api_key,
            secret_key_ciphertext: row.secret_key_ciphertext,
            settings: row.settings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TENANT_COLUMNS: &str = "id, name, subdomain, custom_domain, country_code, is_active, \
     api_key, secret_key_ciphertext, settings, created_at, updated_at";

/// Repository for tenant database operations.
pub struct TenantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TenantRepository<'a> {
    /// Create a new tenant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a tenant by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenant WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Tenant::from))
    }

    /// Look up the tenant a resolved reference points at.
    ///
    /// Path slugs and subdomains both match the `subdomain` column (a
    /// tenant's slug is its subdomain); custom-domain references match
    /// `custom_domain`. Inactive tenants are not returned - the caller
    /// surfaces that as tenant-not-found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_reference(
        &self,
        tenant_ref: &TenantRef,
    ) -> Result<Option<Tenant>, RepositoryError> {
        let column = match tenant_ref.kind {
            TenantRefKind::PathSlug | TenantRefKind::Subdomain => "subdomain",
            TenantRefKind::CustomDomain => "custom_domain",
        };

        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenant WHERE {column} = $1 AND is_active"
        ))
        .bind(&tenant_ref.reference)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Tenant::from))
    }

    /// List all tenants, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Tenant>, RepositoryError> {
        let rows = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenant ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    /// Create a tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the subdomain is taken.
    pub async fn create(
        &self,
        id: &TenantId,
        name: &str,
        subdomain: &str,
        country_code: &str,
    ) -> Result<Tenant, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "INSERT INTO tenant (id, name, subdomain, country_code) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {TENANT_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(name)
        .bind(subdomain)
        .bind(country_code)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("subdomain already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(Tenant::from(row))
    }

    /// Toggle a tenant's activation flag. Returns `false` if no such tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_active(
        &self,
        id: &TenantId,
        is_active: bool,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE tenant SET is_active = $2, updated_at = now() WHERE id = $1")
                .bind(id.as_str())
                .bind(is_active)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace a tenant's settings blob. Returns `false` if no such tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_settings(
        &self,
        id: &TenantId,
        settings: &serde_json::Value,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE tenant SET settings = $2, updated_at = now() WHERE id = $1")
                .bind(id.as_str())
                .bind(settings)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
