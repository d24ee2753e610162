use crate::error::{ApiError, ErrorResponse};
use crate::models::Contact;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /api/persons handler - List every contact
///
/// Contacts come back in creation order.
#[utoipa::path(
    get,
    path = routes::PERSONS,
    responses(
        (status = 200, description = "All contacts", body = Vec<Contact>),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "persons"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Contact>>), ApiError> {
    let contacts = state.store.list().await?;

    tracing::info!("Listed {} contacts", contacts.len());

    Ok((StatusCode::OK, Json(contacts)))
}
