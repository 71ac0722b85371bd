//! HTTP route handlers for the platform.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Health check
//!
//! # Storefront (tenant-scoped, slug in path)
//! GET    /store/{slug}/products             - Tenant catalog from the Provider
//! POST   /store/{slug}/patients             - Patient onboarding
//! GET    /store/{slug}/cart                 - Current cart
//! POST   /store/{slug}/cart/add             - Add a strain to the cart
//! DELETE /store/{slug}/cart/remove          - Remove a strain (?strainId=)
//! DELETE /store/{slug}/cart/clear           - Empty the cart
//! GET    /store/{slug}/orders               - Order history (local)
//! GET    /store/{slug}/orders/{order_id}    - Single order, Provider-refreshed
//!
//! # Admin API (requires auth + role)
//! GET  /api/admin/tenants                   - List tenants (super-admin)
//! POST /api/admin/tenants                   - Create a tenant (super-admin)
//! POST /api/admin/tenants/{id}/activation   - Toggle activation (super-admin)
//! PUT  /api/admin/tenants/{id}/settings     - Update settings (tenant staff)
//! ```
//!
//! Storefront handlers never take the slug as an argument; the tenant
//! context middleware has already classified the request, and the
//! [`ResolvedTenant`](crate::tenancy::ResolvedTenant) extractor hands the
//! reference over. Subdomain and custom-domain storefronts hit the same
//! handlers through the same extractor.

pub mod admin;
pub mod cart;
pub mod health;
pub mod orders;
pub mod patients;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use herba_core::ProviderCredentials;

use crate::error::AppError;
use crate::models::Tenant;
use crate::state::AppState;
use crate::tenancy::TenantRef;

/// Resolve the tenant row and its Provider credentials for a storefront
/// request. The shared prefix of every handler that talks to the Provider
/// directly.
pub(crate) async fn tenant_and_credentials(
    state: &AppState,
    tenant_ref: &TenantRef,
) -> Result<(Tenant, ProviderCredentials), AppError> {
    let tenant = state
        .directory()
        .find_active(tenant_ref)
        .await?
        .ok_or(AppError::TenantNotFound)?;
    let creds = state.credentials().get_credentials(&tenant.id).await?;
    Ok((tenant, creds))
}

/// Create the storefront routes router (nested under `/store/{slug}`).
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/patients", post(patients::create))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/remove", delete(cart::remove))
        .route("/cart/clear", delete(cart::clear))
        .route("/orders", get(orders::index))
        .route("/orders/{order_id}", get(orders::show))
}

/// Create the admin API routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(admin::list_tenants).post(admin::create_tenant))
        .route("/tenants/{id}/activation", post(admin::set_activation))
        .route("/tenants/{id}/settings", put(admin::update_settings))
}

/// Create all routes for the platform.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/store/{slug}", store_routes())
        .nest("/api/admin", admin_routes())
}
