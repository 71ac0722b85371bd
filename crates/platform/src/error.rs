//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; responses are a JSON `{"error": "..."}` envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::provider::ProviderError;
use crate::services::{CartError, CredentialError, OrderError};

/// Application-level error type for the platform.
#[derive(Debug, Error)]
pub enum AppError {
    /// No authenticated actor in the session.
    #[error("Authentication required")]
    Unauthenticated,

    /// The actor is authenticated but not allowed to do this.
    #[error("Forbidden")]
    Forbidden,

    /// Client-fixable input problem.
    #[error("{0}")]
    Validation(String),

    /// The patient must complete their medical consultation first.
    #[error("Complete medical consultation before ordering")]
    ConsultationRequired,

    /// The request resolved to no active tenant.
    #[error("Store not found")]
    TenantNotFound,

    /// No such order for this user.
    #[error("Order not found")]
    OrderNotFound,

    /// Conflicting write, e.g. a duplicate tenant subdomain.
    #[error("{0}")]
    Conflict(String),

    /// Tenant configuration problem (admin-fixable, never client-fixable).
    #[error("Tenant configuration error: {0}")]
    Configuration(String),

    /// Provider API failure.
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::TenantNotFound => Self::TenantNotFound,
            CredentialError::Database(e) => Self::Database(e),
            // Message describes the failure class only; no key material
            other => Self::Configuration(other.to_string()),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidSize(_) | CartError::InvalidQuantity => {
                Self::Validation(err.to_string())
            }
            CartError::TenantNotFound => Self::TenantNotFound,
            CartError::ConsultationRequired => Self::ConsultationRequired,
            CartError::Credentials(e) => e.into(),
            CartError::Provider(e) => Self::Provider(e),
            CartError::Database(e) => Self::Database(e),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::TenantNotFound => Self::TenantNotFound,
            OrderError::NotFound => Self::OrderNotFound,
            OrderError::Credentials(e) => e.into(),
            OrderError::Provider(e) => Self::Provider(e),
            OrderError::Database(e) => Self::Database(e),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::ConsultationRequired => Self::ConsultationRequired,
            other => Self::Provider(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Provider(_) | Self::Configuration(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::ConsultationRequired => StatusCode::BAD_REQUEST,
            Self::TenantNotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Configuration(_) | Self::Provider(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            Self::Configuration(_) => "Store is not configured for ordering".to_string(),
            Self::Provider(e) => format!("Provider error: {e}"),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::ConsultationRequired),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::TenantNotFound), StatusCode::NOT_FOUND);
        assert_eq!(get_status(AppError::OrderNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::Conflict("dup".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Configuration("missing key".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_consultation_maps_from_cart_error() {
        let err: AppError = CartError::ConsultationRequired.into();
        assert!(matches!(err, AppError::ConsultationRequired));
    }

    #[test]
    fn test_missing_credentials_map_to_configuration() {
        let err: AppError = CredentialError::MissingApiKey.into();
        assert!(matches!(err, AppError::Configuration(_)));
        // The client-facing message never names the credential internals
        let status = err.into_response().status();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ownership_mismatch_reads_as_not_found() {
        let err: AppError = OrderError::NotFound.into();
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }
}
