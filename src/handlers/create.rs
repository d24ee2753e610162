use crate::error::{ApiError, ErrorResponse};
use crate::models::{Contact, ContactPayload};
use crate::routes;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

/// POST /api/persons handler - Create a contact
///
/// The store assigns the id. Missing or badly formatted fields are rejected
/// with the validation message and nothing is written.
#[utoipa::path(
    post,
    path = routes::PERSONS,
    request_body = ContactPayload,
    responses(
        (status = 201, description = "Contact created", body = Contact),
        (status = 400, description = "Validation failed or body unreadable", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let Json(payload) = payload?;

    let contact = state.store.create(payload).await?;

    tracing::info!("Successfully created contact with id: {}", contact.id);
    Ok((StatusCode::CREATED, Json(contact)))
}
