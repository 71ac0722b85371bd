//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use herba_core::OrderId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::state::AppState;
use crate::tenancy::ResolvedTenant;

/// `GET /store/{slug}/orders` - the actor's order history.
///
/// Served from the local store; the single-order endpoint is the
/// Provider-refreshed view.
pub async fn index(
    State(state): State<AppState>,
    ResolvedTenant(tenant_ref): ResolvedTenant,
    RequireAuth(actor): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = state.orders().list_orders(&tenant_ref, &actor.id).await?;
    Ok(Json(orders))
}

/// `GET /store/{slug}/orders/{order_id}` - a single order.
///
/// Status and line items are refreshed from the Provider on the way out.
/// An order belonging to another user answers 404, indistinguishable from
/// an order that does not exist.
pub async fn show(
    State(state): State<AppState>,
    ResolvedTenant(tenant_ref): ResolvedTenant,
    RequireAuth(actor): RequireAuth,
    // The slug capture is consumed by the tenant middleware; the extractor
    // above is the authoritative tenant context.
    Path((_slug, order_id)): Path<(String, OrderId)>,
) -> Result<Json<Order>> {
    let order = state
        .orders()
        .get_order(&tenant_ref, &actor.id, &order_id)
        .await?;
    Ok(Json(order))
}
