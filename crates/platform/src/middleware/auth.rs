//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring an authenticated actor in route
//! handlers. The session stores a [`CurrentActor`]; login and signup are
//! handled by the auth collaborator service, so this module only reads the
//! session back.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentActor, session_keys};

/// Extractor that requires an authenticated actor.
///
/// Rejects with a 401 JSON envelope when the session carries no actor.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(actor): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", actor.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentActor);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::Unauthenticated)?;

        let actor: CurrentActor = session
            .get(session_keys::CURRENT_ACTOR)
            .await
            .ok()
            .flatten()
            .ok_or(AppError::Unauthenticated)?;

        Ok(Self(actor))
    }
}

