use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{Contact, ContactPayload};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "phonebook-api",
        version = "1.0.0",
        description = "Phonebook contacts REST API backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::get::get_handler,
        handlers::create::create_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler,
        handlers::info::info_handler
    ),
    components(
        schemas(
            Contact,
            ContactPayload,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "persons", description = "Phonebook contact operations")
    )
)]
pub struct ApiDoc;
