use axum::{
    handler::HandlerWithoutStateExt,
    middleware::from_fn,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::access_log::access_log;
use crate::api_doc::ApiDoc;
use crate::handlers::{
    create_handler, delete_handler, get_handler, health_handler, info_handler, list_handler,
    unknown_endpoint, update_handler,
};
use crate::routes;
use crate::state::AppState;

/// Assemble the request pipeline
///
/// Outermost first: CORS, access log, route dispatch, then for anything no
/// route claims, static files under the configured directory and finally the
/// unknown-endpoint 404.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(unknown_endpoint.into_service());

    api_routes()
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .method_not_allowed_fallback(unknown_endpoint)
        .fallback_service(static_files)
        .layer(from_fn(access_log))
        .layer(cors_layer())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::PERSONS, get(list_handler).post(create_handler))
        .route(
            routes::PERSON_ITEM,
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route(routes::INFO, get(info_handler))
}

/// Allow every origin, method and header
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
