//! Tenant catalog route handlers.
//!
//! The catalog is fetched from the Provider on every request using the
//! tenant's own credentials and country code. No caching and no fallback
//! inventory: if the Provider is down, the storefront says so.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::provider::types::Strain;
use crate::state::AppState;
use crate::tenancy::ResolvedTenant;

use super::tenant_and_credentials;

/// `GET /store/{slug}/products` - list the tenant's catalog.
pub async fn index(
    State(state): State<AppState>,
    ResolvedTenant(tenant_ref): ResolvedTenant,
) -> Result<Json<Vec<Strain>>> {
    let (tenant, creds) = tenant_and_credentials(&state, &tenant_ref).await?;

    let strains = state
        .provider()
        .fetch_products(&creds, &tenant.country_code)
        .await?;

    Ok(Json(strains))
}
