//! Order domain types.
//!
//! Orders are persisted locally but the Provider holds the order of record;
//! status and line items are refreshed from the Provider on read, while
//! `admin_notes` exists only on our side.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use herba_core::{OrderId, OrderStatus, StrainId, TenantId, UserId};

/// A locally persisted order record.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// Staff-facing notes; the Provider has no concept of these.
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single line item on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub strain_id: StrainId,
    pub name: String,
    pub quantity: u32,
    /// Package size in grams.
    pub size_grams: u32,
    #[serde(default)]
    pub price: Decimal,
}
