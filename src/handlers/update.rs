use crate::error::{ApiError, ErrorResponse};
use crate::models::{Contact, ContactPayload};
use crate::routes;
use crate::state::AppState;
use crate::store::parse_id;
use axum::{
    extract::rejection::JsonRejection, extract::Path, extract::State, http::StatusCode, Json,
};

/// PUT /api/persons/{id} handler - Replace name and number of a contact
#[utoipa::path(
    put,
    path = routes::PERSON_ITEM,
    params(
        ("id" = String, Path, description = "Contact id (UUID)")
    ),
    request_body = ContactPayload,
    responses(
        (status = 200, description = "Contact updated", body = Contact),
        (status = 400, description = "Malformatted id, validation failed or body unreadable", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    // A bad id outranks a bad body
    parse_id(&id)?;
    let Json(payload) = payload?;

    match state.store.update(&id, payload).await? {
        Some(contact) => {
            tracing::info!("Successfully updated contact with id: {}", contact.id);
            Ok((StatusCode::OK, Json(contact)))
        }
        None => Err(ApiError::ContactNotFound(id)),
    }
}
