// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const PERSONS: &str = "/api/persons";
pub const PERSON_ITEM: &str = "/api/persons/{id}";
pub const INFO: &str = "/api/info";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
