//! Mapping of registry failures to HTTP responses

use axum::{http::StatusCode, Json};
use farmbook_registry::RegistryError;
use tracing::error;

use crate::models::ErrorResponse;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(status: StatusCode, message: String, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message,
            code: Some(code.to_string()),
        }),
    )
}

/// Store failures are logged here and reported without detail.
pub fn registry_error(err: RegistryError) -> ApiError {
    match err {
        RegistryError::Validation(message) => {
            api_error(StatusCode::BAD_REQUEST, message, "VALIDATION_ERROR")
        }
        RegistryError::Conflict(message) => {
            api_error(StatusCode::BAD_REQUEST, message, "CONFLICT")
        }
        RegistryError::MissingReference(message) => {
            api_error(StatusCode::BAD_REQUEST, message, "MISSING_REFERENCE")
        }
        RegistryError::NotFound(message) => {
            api_error(StatusCode::NOT_FOUND, message, "NOT_FOUND")
        }
        RegistryError::Store(e) => {
            error!("Store failure: {}", e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "INTERNAL_ERROR",
            )
        }
    }
}
