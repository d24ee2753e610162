//! Helpers shared by the handler test modules.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tower::ServiceExt;

use crate::app::build_router;
use crate::config::{Config, StorageConfig};
use crate::models::{Contact, ContactPayload};
use crate::state::AppState;
use crate::store::{ContactStore, MemoryStore, StoreError};

/// Static directory that never exists, so every miss reaches the 404 handler
const NO_STATIC_DIR: &str = "target/phonebook-test-no-static-dir";

pub fn test_state(store: Arc<dyn ContactStore>, static_dir: &str) -> AppState {
    AppState {
        store,
        config: Arc::new(Config {
            storage: StorageConfig::Memory,
            service_port: 3001,
            service_host: "127.0.0.1".to_string(),
            static_dir: static_dir.to_string(),
        }),
    }
}

pub fn memory_app() -> Router {
    build_router(test_state(Arc::new(MemoryStore::new()), NO_STATIC_DIR))
}

pub fn failing_app() -> Router {
    build_router(test_state(Arc::new(FailingStore), NO_STATIC_DIR))
}

/// Send one request through the full router and decode the JSON body
///
/// Empty bodies decode as `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, axum::body::Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes)
}

/// POST a contact and return what the API handed back
pub async fn create_contact(app: &Router, name: &str, number: &str) -> Contact {
    let (status, body) = send(
        app,
        "POST",
        "/api/persons",
        Some(serde_json::json!({ "name": name, "number": number })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    serde_json::from_value(body).unwrap()
}

/// Store whose backend is always down
pub struct FailingStore;

impl FailingStore {
    fn down() -> StoreError {
        StoreError::Backend(anyhow::anyhow!("connection refused by spanner.internal:443"))
    }
}

#[async_trait]
impl ContactStore for FailingStore {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        Err(Self::down())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Err(Self::down())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Contact>, StoreError> {
        Err(Self::down())
    }

    async fn create(&self, _payload: ContactPayload) -> Result<Contact, StoreError> {
        Err(Self::down())
    }

    async fn update(
        &self,
        _id: &str,
        _payload: ContactPayload,
    ) -> Result<Option<Contact>, StoreError> {
        Err(Self::down())
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(Self::down())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(Self::down())
    }
}
