//! Cart route handlers.
//!
//! Carts live at the Provider; these handlers authenticate the actor,
//! delegate to the cart service, and return the Provider's cart as JSON.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use herba_core::StrainId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::provider::types::Cart;
use crate::services::AuditEntry;
use crate::state::AppState;
use crate::tenancy::ResolvedTenant;

/// Request body for adding to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub strain_id: StrainId,
    pub quantity: u32,
    /// Package size in grams; must be one the Provider dispenses.
    pub size_grams: u32,
}

/// Query parameters for removing from the cart.
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    #[serde(rename = "strainId")]
    pub strain_id: StrainId,
}

/// `GET /store/{slug}/cart` - the actor's current cart.
pub async fn show(
    State(state): State<AppState>,
    ResolvedTenant(tenant_ref): ResolvedTenant,
    RequireAuth(actor): RequireAuth,
) -> Result<Json<Cart>> {
    let cart = state.cart().get(&tenant_ref, &actor.id).await?;
    Ok(Json(cart))
}

/// `POST /store/{slug}/cart/add` - add a strain to the cart.
pub async fn add(
    State(state): State<AppState>,
    ResolvedTenant(tenant_ref): ResolvedTenant,
    RequireAuth(actor): RequireAuth,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<Cart>> {
    let cart = state
        .cart()
        .add(
            &tenant_ref,
            &actor.id,
            &body.strain_id,
            body.quantity,
            body.size_grams,
        )
        .await?;

    state.audit().record(
        AuditEntry::new("cart.add", "cart", actor.id.as_str(), &actor).with_metadata(
            serde_json::json!({
                "tenant_ref": tenant_ref.reference,
                "strain_id": body.strain_id,
                "quantity": body.quantity,
                "size_grams": body.size_grams,
            }),
        ),
    );

    Ok(Json(cart))
}

/// `DELETE /store/{slug}/cart/remove?strainId=...` - remove a strain.
pub async fn remove(
    State(state): State<AppState>,
    ResolvedTenant(tenant_ref): ResolvedTenant,
    RequireAuth(actor): RequireAuth,
    Query(query): Query<RemoveQuery>,
) -> Result<Json<Cart>> {
    let cart = state
        .cart()
        .remove(&tenant_ref, &actor.id, &query.strain_id)
        .await?;

    state.audit().record(
        AuditEntry::new("cart.remove", "cart", actor.id.as_str(), &actor).with_metadata(
            serde_json::json!({
                "tenant_ref": tenant_ref.reference,
                "strain_id": query.strain_id,
            }),
        ),
    );

    Ok(Json(cart))
}

/// `DELETE /store/{slug}/cart/clear` - empty the cart.
pub async fn clear(
    State(state): State<AppState>,
    ResolvedTenant(tenant_ref): ResolvedTenant,
    RequireAuth(actor): RequireAuth,
) -> Result<Json<Cart>> {
    let cart = state.cart().clear(&tenant_ref, &actor.id).await?;

    state.audit().record(
        AuditEntry::new("cart.clear", "cart", actor.id.as_str(), &actor).with_metadata(
            serde_json::json!({ "tenant_ref": tenant_ref.reference }),
        ),
    );

    Ok(Json(cart))
}
