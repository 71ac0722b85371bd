//! Admin API route handlers.
//!
//! Tenant management the platform itself needs: listing, activation, and
//! per-tenant settings. Credential onboarding and rotation happen through
//! the CLI, which is the only writer of ciphertext.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use herba_core::{Role, TenantId};

use crate::db::{RepositoryError, TenantRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CurrentActor, Tenant};
use crate::services::AuditEntry;
use crate::state::AppState;

fn require_super_admin(actor: &CurrentActor) -> Result<()> {
    if actor.role == Role::SuperAdmin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Request body for toggling tenant activation.
#[derive(Debug, Deserialize)]
pub struct ActivationRequest {
    pub active: bool,
}

/// `GET /api/admin/tenants` - list all tenants. Super-admin only.
///
/// Credentials never appear in the response; the `Tenant` serializer skips
/// them.
pub async fn list_tenants(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<Json<Vec<Tenant>>> {
    require_super_admin(&actor)?;

    let tenants = TenantRepository::new(state.pool()).list().await?;
    Ok(Json(tenants))
}

/// Request body for creating a tenant.
#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub subdomain: String,
    #[serde(default = "default_country")]
    pub country_code: String,
}

fn default_country() -> String {
    "DE".to_owned()
}

/// `POST /api/admin/tenants` - create a tenant. Super-admin only.
///
/// New tenants start inactive and without Provider credentials; both are
/// provisioned separately before activation makes the storefront reachable.
pub async fn create_tenant(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(body): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<Tenant>)> {
    require_super_admin(&actor)?;

    let id = TenantId::new(uuid::Uuid::new_v4().to_string());
    let tenant = TenantRepository::new(state.pool())
        .create(&id, &body.name, &body.subdomain, &body.country_code)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Database(other),
        })?;

    state.audit().record(
        AuditEntry::new("tenant.create", "tenant", tenant.id.as_str(), &actor)
            .with_metadata(serde_json::json!({ "subdomain": tenant.subdomain })),
    );

    Ok((StatusCode::CREATED, Json(tenant)))
}

/// `POST /api/admin/tenants/{id}/activation` - toggle activation.
/// Super-admin only.
///
/// Deactivation takes effect on the next request: resolution only matches
/// active tenants, so the storefront answers 404 immediately.
pub async fn set_activation(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<TenantId>,
    Json(body): Json<ActivationRequest>,
) -> Result<Json<serde_json::Value>> {
    require_super_admin(&actor)?;

    let updated = TenantRepository::new(state.pool())
        .set_active(&id, body.active)
        .await?;
    if !updated {
        return Err(AppError::TenantNotFound);
    }

    state.audit().record(
        AuditEntry::new("tenant.activation", "tenant", id.as_str(), &actor)
            .with_metadata(serde_json::json!({ "active": body.active })),
    );

    Ok(Json(serde_json::json!({ "id": id, "active": body.active })))
}

/// `PUT /api/admin/tenants/{id}/settings` - replace the settings blob.
///
/// Allowed for super-admins and for tenant staff of the same tenant.
pub async fn update_settings(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<TenantId>,
    Json(settings): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>> {
    if !actor.can_manage_tenant(&id) {
        return Err(AppError::Forbidden);
    }

    let updated = TenantRepository::new(state.pool())
        .update_settings(&id, &settings)
        .await?;
    if !updated {
        return Err(AppError::TenantNotFound);
    }

    state
        .audit()
        .record(AuditEntry::new("tenant.settings", "tenant", id.as_str(), &actor));

    Ok(Json(serde_json::json!({ "id": id, "settings": settings })))
}
