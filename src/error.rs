use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Every variant renders as a JSON `{ "error": ... }` body. Storage errors
/// are classified once, in `From<StoreError>`.
#[derive(Debug)]
pub enum ApiError {
    /// Path id is not a valid contact id
    MalformedId,
    /// Contact fields failed validation
    Validation(String),
    /// Request body could not be read as a contact payload
    MalformedBody(String),
    /// No contact with this id (PUT)
    ContactNotFound(String),
    /// Nothing is registered for this method and path
    UnknownEndpoint,
    /// Any other storage failure
    DatabaseError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::MalformedId => (StatusCode::BAD_REQUEST, "malformatted id".to_string()),
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::MalformedBody(detail) => (
                StatusCode::BAD_REQUEST,
                format!("malformed request body: {}", detail),
            ),
            ApiError::ContactNotFound(id) => {
                tracing::info!("Contact not found with id: {}", id);
                (StatusCode::NOT_FOUND, "person not found".to_string())
            }
            ApiError::UnknownEndpoint => {
                (StatusCode::NOT_FOUND, "unknown endpoint".to_string())
            }
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MalformedId(id) => {
                tracing::info!("Rejected malformed id: {}", id);
                ApiError::MalformedId
            }
            StoreError::Validation(err) => {
                tracing::info!("{}", err);
                ApiError::Validation(err.to_string())
            }
            StoreError::Backend(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}
