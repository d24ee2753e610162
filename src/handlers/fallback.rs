use crate::error::ApiError;

/// Catch-all for requests no route or static file claims
pub async fn unknown_endpoint() -> ApiError {
    ApiError::UnknownEndpoint
}
