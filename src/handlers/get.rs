use crate::error::{ApiError, ErrorResponse};
use crate::models::Contact;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, extract::Path, http::StatusCode, Json};

/// GET /api/persons/{id} handler - Retrieve one contact
///
/// A well-formed id with no contact behind it is answered like any other
/// unknown endpoint.
#[utoipa::path(
    get,
    path = routes::PERSON_ITEM,
    params(
        ("id" = String, Path, description = "Contact id (UUID)")
    ),
    responses(
        (status = 200, description = "Contact found", body = Contact),
        (status = 400, description = "Malformatted id", body = ErrorResponse),
        (status = 404, description = "Unknown endpoint", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    match state.store.find_by_id(&id).await? {
        Some(contact) => {
            tracing::info!("Successfully retrieved contact with id: {}", id);
            Ok((StatusCode::OK, Json(contact)))
        }
        None => {
            tracing::info!("Contact not found with id: {}", id);
            Err(ApiError::UnknownEndpoint)
        }
    }
}
