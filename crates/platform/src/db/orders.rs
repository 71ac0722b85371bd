//! Order repository for database operations.
//!
//! Line items are stored as a JSONB column; status as text. The Provider is
//! the order of record, so this repository only reads - reconciliation
//! happens in memory on the way out, never as a write-back.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use herba_core::{OrderId, OrderStatus, TenantId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

/// Database row for the `order` table.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    tenant_id: String,
    user_id: String,
    items: Json<Vec<OrderItem>>,
    status: String,
    admin_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            status: OrderStatus::parse(&row.status),
            admin_notes: row.admin_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ORDER_COLUMNS: &str =
    "id, tenant_id, user_id, items, status, admin_notes, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order scoped to a tenant.
    ///
    /// The tenant scope is part of the key: an order ID from another tenant
    /// does not exist as far as this lookup is concerned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_scoped(
        &self,
        order_id: &OrderId,
        tenant_id: &TenantId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(order_id.as_str())
        .bind(tenant_id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// List a user's orders within a tenant, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" \
             WHERE user_id = $1 AND tenant_id = $2 \
             ORDER BY created_at DESC"
        ))
        .bind(user_id.as_str())
        .bind(tenant_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
