use crate::error::{ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode};

/// DELETE /api/persons/{id} handler - Remove a contact
///
/// Answers 204 whether or not the contact existed.
#[utoipa::path(
    delete,
    path = routes::PERSON_ITEM,
    params(
        ("id" = String, Path, description = "Contact id (UUID)")
    ),
    responses(
        (status = 204, description = "Contact removed (or was never there)"),
        (status = 400, description = "Malformatted id", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await?;

    tracing::info!("Deleted contact with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
