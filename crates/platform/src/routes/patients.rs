//! Patient onboarding route handlers.
//!
//! Registration is delegated to the Provider; we hold no medical data
//! locally. The Provider answers with a client ID and a KYC link the patient
//! must complete before ordering is unlocked.

use axum::{Json, extract::State, http::StatusCode};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::provider::types::{NewPatient, PatientRegistration};
use crate::services::AuditEntry;
use crate::state::AppState;
use crate::tenancy::ResolvedTenant;

use super::tenant_and_credentials;

/// `POST /store/{slug}/patients` - register the actor as a patient.
pub async fn create(
    State(state): State<AppState>,
    ResolvedTenant(tenant_ref): ResolvedTenant,
    RequireAuth(actor): RequireAuth,
    Json(patient): Json<NewPatient>,
) -> Result<(StatusCode, Json<PatientRegistration>)> {
    if !patient.medical_record.consent {
        return Err(AppError::Validation(
            "medical record consent is required".to_owned(),
        ));
    }

    let (tenant, creds) = tenant_and_credentials(&state, &tenant_ref).await?;

    let registration = state.provider().create_patient(&creds, &patient).await?;

    // Metadata carries identifiers only, never the medical record
    state.audit().record(
        AuditEntry::new(
            "patient.register",
            "patient",
            registration.client_id.as_str(),
            &actor,
        )
        .with_metadata(serde_json::json!({ "tenant_id": tenant.id })),
    );

    Ok((StatusCode::CREATED, Json(registration)))
}
