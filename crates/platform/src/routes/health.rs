//! Health check endpoint.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::error::Result;
use crate::state::AppState;

/// Liveness and readiness probe.
///
/// Runs a trivial query so a wedged pool reports unhealthy instead of
/// answering 200 while every real request fails.
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(crate::db::RepositoryError::from)?;

    Ok(Json(json!({ "status": "ok" })))
}
